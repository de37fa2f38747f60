use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::services::shipments::{
    CreateShipmentRequest, RecordReadingRequest, RecordReadingResponse,
    RecordTrackingEventRequest, ShipmentResponse, TemperatureAlertResponse,
    TemperatureReadingResponse, TrackingEventResponse,
};
use crate::{ApiResponse, ApiResult, AppState};

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ApiResponse<ShipmentResponse>),
        (status = 422, description = "Over-allocation", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or line item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(payload): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentResponse>>), crate::errors::ServiceError> {
    let shipment = state.services.shipments.create_shipment(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(shipment))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentResponse>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentResponse> {
    let shipment = state.services.shipments.get_shipment(id).await?;
    Ok(Json(ApiResponse::success(shipment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/events",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = RecordTrackingEventRequest,
    responses(
        (status = 200, description = "Tracking event recorded", body = ApiResponse<TrackingEventResponse>),
        (status = 422, description = "Invalid status transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn record_tracking_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordTrackingEventRequest>,
) -> ApiResult<TrackingEventResponse> {
    let event = state
        .services
        .shipments
        .record_tracking_event(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(event)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/events",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Tracking events listed", body = ApiResponse<Vec<TrackingEventResponse>>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn list_tracking_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<TrackingEventResponse>> {
    let events = state.services.shipments.list_tracking_events(id).await?;
    Ok(Json(ApiResponse::success(events)))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/readings",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = RecordReadingRequest,
    responses(
        (status = 200, description = "Reading recorded, alert included when violated", body = ApiResponse<RecordReadingResponse>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn record_temperature_reading(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordReadingRequest>,
) -> ApiResult<RecordReadingResponse> {
    let outcome = state
        .services
        .shipments
        .record_temperature_reading(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/readings",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Readings listed", body = ApiResponse<Vec<TemperatureReadingResponse>>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn list_readings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<TemperatureReadingResponse>> {
    let readings = state.services.shipments.list_readings(id).await?;
    Ok(Json(ApiResponse::success(readings)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/alerts",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Alerts listed", body = ApiResponse<Vec<TemperatureAlertResponse>>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<TemperatureAlertResponse>> {
    let alerts = state.services.shipments.list_alerts(id).await?;
    Ok(Json(ApiResponse::success(alerts)))
}
