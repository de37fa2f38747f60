pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Common response envelope for successful requests.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn message(message: String) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All `/api/v1` routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/cancel", post(handlers::orders::cancel_order))
        .route("/orders/:id/refund", post(handlers::orders::refund_order))
        .route(
            "/orders/:id/complete",
            post(handlers::orders::complete_order),
        )
        .route(
            "/orders/:id/line-items/:item_id/status",
            put(handlers::orders::update_line_item_status),
        )
        .route(
            "/orders/:id/line-items/:item_id/timeline",
            get(handlers::orders::get_line_item_timeline),
        )
        .route(
            "/orders/:id/shipments",
            get(handlers::orders::list_order_shipments),
        )
        .route("/shipments", post(handlers::shipments::create_shipment))
        .route("/shipments/:id", get(handlers::shipments::get_shipment))
        .route(
            "/shipments/:id/events",
            post(handlers::shipments::record_tracking_event)
                .get(handlers::shipments::list_tracking_events),
        )
        .route(
            "/shipments/:id/readings",
            post(handlers::shipments::record_temperature_reading)
                .get(handlers::shipments::list_readings),
        )
        .route("/shipments/:id/alerts", get(handlers::shipments::list_alerts))
        .route("/status", get(api_status))
        .route("/health", get(health_check))
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Service identity and version.
pub async fn api_status() -> Json<ApiResponse<StatusResponse>> {
    Json(ApiResponse::success(StatusResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    db::check_connection(&state.db).await?;
    Ok(Json(ApiResponse::success("ok")))
}
