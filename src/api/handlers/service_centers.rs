//! Handlers for service center endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::deletion::DeletionResponse;
use crate::api::dto::service_center::{ServiceCenterItem, ServiceCenterRequest};
use crate::api::dto::service_request::ServiceRequestItem;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/service-centers`
pub async fn list_service_centers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceCenterItem>>, AppError> {
    let centers = state.service_center_service.get_all().await?;
    Ok(Json(centers.into_iter().map(Into::into).collect()))
}

/// `GET /api/service-centers/{id}`
pub async fn get_service_center_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceCenterItem>, AppError> {
    let center = state.service_center_service.get_by_id(id).await?;
    Ok(Json(center.into()))
}

/// `GET /api/service-centers/by-name/{name}`
pub async fn get_service_center_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceCenterItem>, AppError> {
    let center = state.service_center_service.get_by_name(&name).await?;
    Ok(Json(center.into()))
}

/// `POST /api/service-centers`
pub async fn create_service_center_handler(
    State(state): State<AppState>,
    Json(payload): Json<ServiceCenterRequest>,
) -> Result<(StatusCode, Json<ServiceCenterItem>), AppError> {
    let center = state.service_center_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(center.into())))
}

/// `PUT /api/service-centers/{id}`
pub async fn update_service_center_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceCenterRequest>,
) -> Result<Json<ServiceCenterItem>, AppError> {
    let center = state
        .service_center_service
        .update(id, payload.into())
        .await?;
    Ok(Json(center.into()))
}

/// `DELETE /api/service-centers/{id}`
pub async fn delete_service_center_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletionResponse>, AppError> {
    let plan = state.service_center_service.delete(id).await?;
    Ok(Json(plan.into()))
}

/// `GET /api/service-centers/{id}/requests`
pub async fn service_center_requests_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ServiceRequestItem>>, AppError> {
    let requests = state.service_center_service.get_requests(id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Re-points an existing request to this service center.
///
/// `PUT /api/service-centers/{id}/requests/{request_id}`
pub async fn add_request_handler(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(i64, i64)>,
) -> Result<Json<ServiceRequestItem>, AppError> {
    let request = state
        .service_center_service
        .add_to_service_center(id, request_id)
        .await?;
    Ok(Json(request.into()))
}

/// Withdraws a request from this service center, deleting it.
///
/// `DELETE /api/service-centers/{id}/requests/{request_id}`
pub async fn remove_request_handler(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .service_center_service
        .remove_from_service_center(id, request_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
