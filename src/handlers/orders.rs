use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::models::OrderStatus;
use crate::services::line_items::{TimelineEventResponse, UpdateLineItemStatusRequest};
use crate::services::orders::{
    CancelOrderRequest, CreateOrderRequest, LineItemResponse, OrderDetailResponse,
    OrderListFilter, OrderListResponse, OrderResponse, RefundOrderRequest,
};
use crate::services::shipments::ShipmentResponse;
use crate::{ApiResponse, ApiResult, AppState};

/// Query parameters for listing orders.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    /// Page number (1-based)
    pub page: Option<u64>,
    /// Items per page (max 100)
    pub per_page: Option<u64>,
    pub buyer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDetailResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetailResponse>>), crate::errors::ServiceError> {
    let order = state.services.orders.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders listed", body = ApiResponse<OrderListResponse>)
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<OrderListResponse> {
    let filter = OrderListFilter {
        buyer_id: query.buyer_id,
        supplier_id: query.supplier_id,
        status: query.status,
    };
    let orders = state
        .services
        .orders
        .list_orders(query.page.unwrap_or(1), query.per_page.unwrap_or(20), filter)
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order fetched", body = ApiResponse<OrderDetailResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderDetailResponse> {
    let order = state.services.orders.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order cannot be cancelled", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelOrderRequest>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.cancel_order(id, payload).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/refund",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = RefundOrderRequest,
    responses(
        (status = 200, description = "Order refunded", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order cannot be refunded", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn refund_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RefundOrderRequest>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.refund_order(id, payload).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/complete",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order completed", body = ApiResponse<OrderResponse>),
        (status = 422, description = "Fulfillment threshold not met", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.complete_fulfillment(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/line-items/{item_id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    request_body = UpdateLineItemStatusRequest,
    responses(
        (status = 200, description = "Line item status updated", body = ApiResponse<LineItemResponse>),
        (status = 422, description = "Invalid status transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or line item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn update_line_item_status(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateLineItemStatusRequest>,
) -> ApiResult<LineItemResponse> {
    let item = state
        .services
        .line_items
        .update_status(id, item_id, payload)
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/line-items/{item_id}/timeline",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 200, description = "Timeline fetched", body = ApiResponse<Vec<TimelineEventResponse>>),
        (status = 404, description = "Order or line item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_line_item_timeline(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Vec<TimelineEventResponse>> {
    let timeline = state.services.line_items.get_timeline(id, item_id).await?;
    Ok(Json(ApiResponse::success(timeline)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/shipments",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<Vec<ShipmentResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn list_order_shipments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ShipmentResponse>> {
    let shipments = state.services.shipments.list_for_order(id).await?;
    Ok(Json(ApiResponse::success(shipments)))
}
