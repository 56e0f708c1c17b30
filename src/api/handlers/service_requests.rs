//! Handlers for service request endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::service_request::{
    CreateServiceRequest, ServiceRequestItem, StatusRequest, UpdateServiceRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/requests`
pub async fn list_requests_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceRequestItem>>, AppError> {
    let requests = state.service_request_service.get_all().await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// `GET /api/requests/{id}`
pub async fn get_request_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceRequestItem>, AppError> {
    let request = state.service_request_service.get_by_id(id).await?;
    Ok(Json(request.into()))
}

/// Files a service request.
///
/// # Endpoint
///
/// `POST /api/requests`
///
/// # Request Body
///
/// ```json
/// {
///   "description": "Brake check",
///   "status": "PENDING",          // optional
///   "created_at": "2024-05-01T09:30:00Z", // optional
///   "car_id": 3,
///   "customer_id": 1,
///   "service_center_id": 2
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: blank description or non-positive ids
/// - **404 Not Found**: car, customer or service center does not exist
pub async fn create_request_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceRequestItem>), AppError> {
    let request = state.service_request_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

/// `PUT /api/requests/{id}`
pub async fn update_request_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<ServiceRequestItem>, AppError> {
    let request = state
        .service_request_service
        .update(id, payload.into())
        .await?;
    Ok(Json(request.into()))
}

/// `PATCH /api/requests/{id}/status`
pub async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<ServiceRequestItem>, AppError> {
    let request = state
        .service_request_service
        .update_status(id, &payload.status)
        .await?;
    Ok(Json(request.into()))
}

/// `DELETE /api/requests/{id}`
pub async fn delete_request_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service_request_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
