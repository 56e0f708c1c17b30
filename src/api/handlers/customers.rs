//! Handlers for customer endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::car::CarItem;
use crate::api::dto::customer::{CustomerItem, CustomerRequest};
use crate::api::dto::deletion::DeletionResponse;
use crate::api::dto::service_request::ServiceRequestItem;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/customers`
pub async fn list_customers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerItem>>, AppError> {
    let customers = state.customer_service.get_all().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// `GET /api/customers/{id}`
pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerItem>, AppError> {
    let customer = state.customer_service.get_by_id(id).await?;
    Ok(Json(customer.into()))
}

/// `GET /api/customers/by-email/{email}`
pub async fn get_customer_by_email_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<CustomerItem>, AppError> {
    let customer = state.customer_service.get_by_email(&email).await?;
    Ok(Json(customer.into()))
}

/// Registers a customer.
///
/// # Endpoint
///
/// `POST /api/customers`
///
/// # Errors
///
/// - **400 Bad Request**: a field fails validation
/// - **409 Conflict**: email or phone already registered
pub async fn create_customer_handler(
    State(state): State<AppState>,
    Json(payload): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerItem>), AppError> {
    let customer = state.customer_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// `PUT /api/customers/{id}`
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<CustomerItem>, AppError> {
    let customer = state.customer_service.update(id, payload.into()).await?;
    Ok(Json(customer.into()))
}

/// Deletes a customer with its cars and their service requests.
///
/// # Endpoint
///
/// `DELETE /api/customers/{id}`
///
/// # Response
///
/// ```json
/// { "kind": "customer", "id": 1, "deleted_cars": [3, 4], "deleted_requests": [7] }
/// ```
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletionResponse>, AppError> {
    let plan = state.customer_service.delete(id).await?;
    Ok(Json(plan.into()))
}

/// `GET /api/customers/{id}/cars`
pub async fn customer_cars_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CarItem>>, AppError> {
    let cars = state.customer_service.get_cars(id).await?;
    Ok(Json(cars.into_iter().map(Into::into).collect()))
}

/// `GET /api/customers/{id}/requests`
pub async fn customer_requests_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ServiceRequestItem>>, AppError> {
    let requests = state.service_request_service.get_by_customer_id(id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}
