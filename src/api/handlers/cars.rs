//! Handlers for car endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::car::{BulkItem, BulkQuery, BulkResponse, CarItem, CarRequest, TransferRequest};
use crate::api::dto::deletion::DeletionResponse;
use crate::api::dto::service_request::ServiceRequestItem;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/cars`
pub async fn list_cars_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarItem>>, AppError> {
    let cars = state.car_service.get_all().await?;
    Ok(Json(cars.into_iter().map(Into::into).collect()))
}

/// `GET /api/cars/{id}`
pub async fn get_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarItem>, AppError> {
    let car = state.car_service.get_by_id(id).await?;
    Ok(Json(car.into()))
}

/// `GET /api/cars/by-vin/{vin}`
pub async fn get_car_by_vin_handler(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<CarItem>, AppError> {
    let car = state.car_service.get_by_vin(&vin).await?;
    Ok(Json(car.into()))
}

/// `POST /api/cars`
pub async fn create_car_handler(
    State(state): State<AppState>,
    Json(payload): Json<CarRequest>,
) -> Result<(StatusCode, Json<CarItem>), AppError> {
    let car = state.car_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(car.into())))
}

/// Creates many cars at once.
///
/// # Endpoint
///
/// `POST /api/cars/bulk?year_filter=2015`
///
/// Items are processed independently. With `year_filter`, cars of any other
/// model year are skipped. Per-item failures are reported in `items` and
/// never fail the whole request.
pub async fn create_cars_bulk_handler(
    State(state): State<AppState>,
    Query(query): Query<BulkQuery>,
    Json(payload): Json<Vec<CarRequest>>,
) -> Json<BulkResponse> {
    let items = payload.into_iter().map(Into::into).collect();
    let results = state.car_service.create_bulk(items, query.year_filter).await;

    let items: Vec<BulkItem> = results.into_iter().map(Into::into).collect();
    let created = items
        .iter()
        .filter(|i| matches!(i, BulkItem::Created { .. }))
        .count();

    Json(BulkResponse { created, items })
}

/// `PUT /api/cars/{id}`
pub async fn update_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CarRequest>,
) -> Result<Json<CarItem>, AppError> {
    let car = state.car_service.update(id, payload.into()).await?;
    Ok(Json(car.into()))
}

/// `DELETE /api/cars/{id}`
pub async fn delete_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletionResponse>, AppError> {
    let plan = state.car_service.delete(id).await?;
    Ok(Json(plan.into()))
}

/// Moves a car to another customer.
///
/// # Endpoint
///
/// `PUT /api/cars/{id}/owner`
///
/// # Request Body
///
/// ```json
/// { "customer_id": 2 }
/// ```
///
/// # Errors
///
/// - **404 Not Found**: car or new owner does not exist
/// - **409 Conflict**: the car changed owner concurrently
pub async fn transfer_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<CarItem>, AppError> {
    let car = state
        .car_service
        .transfer_ownership(id, payload.customer_id)
        .await?;
    Ok(Json(car.into()))
}

/// `GET /api/cars/{id}/requests`
pub async fn car_requests_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ServiceRequestItem>>, AppError> {
    let requests = state.service_request_service.get_by_car_id(id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}
