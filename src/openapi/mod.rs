use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ColdTrack API",
        version = "1.0.0",
        description = r#"
# Order Fulfillment and Cold-Chain Tracking API

Tracks purchase orders from creation through partial shipments to delivery,
including temperature compliance for cold-chain line items.

- **Orders**: aggregate roots owning line items and shipments; status and
  totals are derived from line-item state and recomputed on every mutation.
- **Line items**: advance through a fixed status chain with an append-only
  timeline; quantity counters never exceed the declared quantity.
- **Shipments**: carry quantities of line items; over-allocation is rejected.
  Carrier tracking events drive the shipment status forward.
- **Cold chain**: temperature readings are appended per shipment and checked
  against per-zone thresholds; violations raise alerts that are never retracted.

## Error Handling

Failed requests return a consistent JSON envelope with an appropriate status:
404 unknown resource, 422 rejected transition / over-allocation / unmet
fulfillment threshold, 409 concurrent modification (retryable), 400 invalid
input, 500 internal error.
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Order and line item management"),
        (name = "shipments", description = "Shipments, tracking events, and cold-chain readings")
    ),
    paths(
        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::cancel_order,
        crate::handlers::orders::refund_order,
        crate::handlers::orders::complete_order,
        crate::handlers::orders::update_line_item_status,
        crate::handlers::orders::get_line_item_timeline,
        crate::handlers::orders::list_order_shipments,

        // Shipments
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::get_shipment,
        crate::handlers::shipments::record_tracking_event,
        crate::handlers::shipments::list_tracking_events,
        crate::handlers::shipments::record_temperature_reading,
        crate::handlers::shipments::list_readings,
        crate::handlers::shipments::list_alerts,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,

            // Order types
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::CreateOrderItemRequest,
            crate::services::orders::CancelOrderRequest,
            crate::services::orders::RefundOrderRequest,
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderDetailResponse,
            crate::services::orders::OrderListResponse,
            crate::services::orders::LineItemResponse,
            crate::services::line_items::UpdateLineItemStatusRequest,
            crate::services::line_items::TimelineEventResponse,
            crate::models::OrderStatus,
            crate::models::OrderPriority,
            crate::models::LineItemStatus,

            // Shipment types
            crate::services::shipments::CreateShipmentRequest,
            crate::services::shipments::ShipmentItemRequest,
            crate::services::shipments::RecordTrackingEventRequest,
            crate::services::shipments::RecordReadingRequest,
            crate::services::shipments::ShipmentResponse,
            crate::services::shipments::ShipmentItemResponse,
            crate::services::shipments::TrackingEventResponse,
            crate::services::shipments::RecordReadingResponse,
            crate::services::shipments::TemperatureReadingResponse,
            crate::services::shipments::TemperatureAlertResponse,
            crate::models::ShipmentStatus,
            crate::models::TemperatureZone,
            crate::models::temperature::TemperatureUnit,
            crate::models::temperature::AlertSeverity,
        )
    )
)]
pub struct ApiDoc;

/// Mounts Swagger UI at `/docs` with the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
