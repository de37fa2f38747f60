mod common;

use assert_matches::assert_matches;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coldtrack_api::errors::ServiceError;
use coldtrack_api::models::{LineItemStatus, ShipmentStatus};
use coldtrack_api::services::line_items::UpdateLineItemStatusRequest;
use coldtrack_api::services::orders::{CancelOrderRequest, RefundOrderRequest};
use coldtrack_api::services::shipments::RecordTrackingEventRequest;
use common::{line_item, order_request, shipment_request, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn confirm(actor: &str) -> UpdateLineItemStatusRequest {
    UpdateLineItemStatusRequest {
        status: LineItemStatus::Confirmed,
        actor: actor.to_string(),
        notes: None,
    }
}

fn tracking(status: ShipmentStatus) -> RecordTrackingEventRequest {
    RecordTrackingEventRequest {
        status,
        description: format!("carrier reported {}", status),
        location: None,
        occurred_at: None,
    }
}

#[tokio::test]
async fn create_order_snapshots_items_and_derives_totals() {
    let app = TestApp::new().await;

    let mut request = order_request(vec![
        line_item("SKU-A", 3, dec!(15.25)),
        line_item("SKU-B", 2, dec!(10.00)),
    ]);
    request.tax = Some(dec!(5.00));
    request.shipping_cost = Some(dec!(2.00));
    request.discount = Some(dec!(1.00));

    let detail = app.state.services.orders.create_order(request).await.unwrap();

    assert!(detail.order.order_number.starts_with("ORD-"));
    assert_eq!(detail.order.status, "pending");
    assert_eq!(detail.order.subtotal, dec!(65.75));
    assert_eq!(detail.order.total, dec!(71.75));
    assert_eq!(detail.order.fulfillment_percentage, 0);
    assert_eq!(detail.line_items.len(), 2);
    for item in &detail.line_items {
        assert_eq!(item.status, "pending");
        assert_eq!(item.allocated_quantity, 0);
        assert_eq!(item.shipped_quantity, 0);
        assert_eq!(item.delivered_quantity, 0);
    }
    let first = detail.line_items.iter().find(|i| i.sku == "SKU-A").unwrap();
    assert_eq!(first.total_price, dec!(45.75));
}

#[tokio::test]
async fn order_without_items_is_rejected() {
    let app = TestApp::new().await;
    let err = app
        .state
        .services
        .orders
        .create_order(order_request(vec![]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn confirming_all_items_derives_confirmed_order() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let line_items = &app.state.services.line_items;

    let detail = orders
        .create_order(order_request(vec![
            line_item("SKU-A", 10, dec!(1.00)),
            line_item("SKU-B", 5, dec!(2.00)),
        ]))
        .await
        .unwrap();
    let order_id = detail.order.id;

    line_items
        .update_status(order_id, detail.line_items[0].id, confirm("ops"))
        .await
        .unwrap();
    // One item confirmed is not enough.
    let mid = orders.get_order(order_id).await.unwrap();
    assert_eq!(mid.order.status, "pending");

    line_items
        .update_status(order_id, detail.line_items[1].id, confirm("ops"))
        .await
        .unwrap();
    let after = orders.get_order(order_id).await.unwrap();
    assert_eq!(after.order.status, "confirmed");
}

#[tokio::test]
async fn skipping_a_status_step_is_rejected() {
    let app = TestApp::new().await;
    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 1, dec!(9.99))]))
        .await
        .unwrap();

    let err = app
        .state
        .services
        .line_items
        .update_status(
            detail.order.id,
            detail.line_items[0].id,
            UpdateLineItemStatusRequest {
                status: LineItemStatus::Shipped,
                actor: "ops".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });

    // Nothing moved.
    let after = app.state.services.orders.get_order(detail.order.id).await.unwrap();
    assert_eq!(after.line_items[0].status, "pending");
    assert_eq!(after.order.version, detail.order.version);
}

#[tokio::test]
async fn full_lifecycle_reaches_completed() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![
            line_item("SKU-A", 10, dec!(3.00)),
            line_item("SKU-B", 4, dec!(7.50)),
        ]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item_a = detail.line_items[0].id;
    let item_b = detail.line_items[1].id;

    let shipment = shipments
        .create_shipment(shipment_request(order_id, vec![(item_a, 10), (item_b, 4)]))
        .await
        .unwrap();
    assert_eq!(shipment.status, "preparing");

    let mid = orders.get_order(order_id).await.unwrap();
    assert_eq!(mid.order.status, "partially_shipped");
    assert!(mid.line_items.iter().all(|i| i.status == "shipped"));

    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Dispatched))
        .await
        .unwrap();
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let delivered = orders.get_order(order_id).await.unwrap();
    assert_eq!(delivered.order.status, "delivered");
    assert_eq!(delivered.order.fulfillment_percentage, 100);
    assert!(delivered.line_items.iter().all(|i| i.status == "delivered"));

    let completed = orders.complete_fulfillment(order_id).await.unwrap();
    assert_eq!(completed.status, "completed");

    let shipment_after = shipments.get_shipment(shipment.id).await.unwrap();
    assert_eq!(shipment_after.status, "delivered");
    assert!(shipment_after.actual_delivery.is_some());
    assert!(shipment_after.actual_pickup.is_some());
}

#[tokio::test]
async fn completing_below_threshold_is_rejected() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let mut request = order_request(vec![line_item("SKU-A", 10, dec!(1.00))]);
    request.allow_partial_fulfillment = true;
    request.minimum_fulfillment_percentage = Some(50);
    let detail = orders.create_order(request).await.unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    // Deliver 4 of 10: 40% < 50% minimum.
    let first = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 4)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(first.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let err = orders.complete_fulfillment(order_id).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::FulfillmentThresholdNotMet {
            required: 50,
            actual: 40
        }
    );

    // Deliver one more: 50% meets the minimum.
    let second = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 1)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(second.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let completed = orders.complete_fulfillment(order_id).await.unwrap();
    assert_eq!(completed.status, "completed");
    assert_eq!(completed.fulfillment_percentage, 50);
}

#[tokio::test]
async fn full_delivery_is_required_without_partial_fulfillment() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let shipment = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 9)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let err = orders.complete_fulfillment(detail.order.id).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::FulfillmentThresholdNotMet {
            required: 100,
            actual: 90
        }
    );

    // Delivering the remainder satisfies the policy and derives delivered.
    let rest = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 1)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(rest.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let after = orders.get_order(detail.order.id).await.unwrap();
    assert_eq!(after.order.status, "delivered");
    assert_eq!(after.order.fulfillment_percentage, 100);
    orders.complete_fulfillment(detail.order.id).await.unwrap();
}

#[tokio::test]
async fn cancellation_spares_shipped_items() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;
    let line_items = &app.state.services.line_items;

    let detail = orders
        .create_order(order_request(vec![
            line_item("SKU-A", 5, dec!(1.00)),
            line_item("SKU-B", 5, dec!(1.00)),
        ]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let shipped_item = detail.line_items[0].id;
    let pending_item = detail.line_items[1].id;

    shipments
        .create_shipment(shipment_request(order_id, vec![(shipped_item, 5)]))
        .await
        .unwrap();

    let cancelled = orders
        .cancel_order(
            order_id,
            CancelOrderRequest {
                reason: Some("buyer withdrew".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("buyer withdrew"));

    let after = orders.get_order(order_id).await.unwrap();
    let shipped = after.line_items.iter().find(|i| i.id == shipped_item).unwrap();
    let rest = after.line_items.iter().find(|i| i.id == pending_item).unwrap();
    assert_eq!(shipped.status, "shipped");
    assert_eq!(rest.status, "cancelled");

    // The cancellation left a timeline entry on the cancelled item.
    let timeline = line_items.get_timeline(order_id, pending_item).await.unwrap();
    let last = timeline.last().unwrap();
    assert_eq!(last.status, "cancelled");
    assert_eq!(last.notes.as_deref(), Some("buyer withdrew"));
}

#[tokio::test]
async fn refund_closes_unshipped_items_like_cancellation() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![
            line_item("SKU-A", 5, dec!(1.00)),
            line_item("SKU-B", 5, dec!(1.00)),
        ]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let shipped_item = detail.line_items[0].id;

    shipments
        .create_shipment(shipment_request(order_id, vec![(shipped_item, 5)]))
        .await
        .unwrap();

    let refunded = orders
        .refund_order(
            order_id,
            RefundOrderRequest {
                reason: Some("damaged on arrival".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(refunded.status, "refunded");
    assert_eq!(refunded.cancel_reason.as_deref(), Some("damaged on arrival"));

    // Shipped quantities stay tracked; the rest is closed out.
    let after = orders.get_order(order_id).await.unwrap();
    let shipped = after.line_items.iter().find(|i| i.id == shipped_item).unwrap();
    let rest = after.line_items.iter().find(|i| i.id != shipped_item).unwrap();
    assert_eq!(shipped.status, "shipped");
    assert_eq!(rest.status, "cancelled");

    // Refunded is terminal: no further shipments or completion.
    let err = shipments
        .create_shipment(shipment_request(order_id, vec![(shipped_item, 1)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
    let err = orders.refund_order(order_id, RefundOrderRequest { reason: None }).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn delivered_orders_cannot_be_refunded() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 2, dec!(1.00))]))
        .await
        .unwrap();
    let shipment = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 2)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let err = orders
        .refund_order(detail.order.id, RefundOrderRequest { reason: None })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn delivered_orders_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 2, dec!(1.00))]))
        .await
        .unwrap();
    let shipment = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 2)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let err = orders
        .cancel_order(detail.order.id, CancelOrderRequest { reason: None })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn cancelled_orders_reject_new_shipments() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 5, dec!(1.00))]))
        .await
        .unwrap();
    orders
        .cancel_order(detail.order.id, CancelOrderRequest { reason: None })
        .await
        .unwrap();

    let err = app
        .state
        .services
        .shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 5)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn unknown_order_returns_not_found() {
    let app = TestApp::new().await;
    let err = app
        .state
        .services
        .orders
        .get_order(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn http_surface_round_trip() {
    let app = TestApp::new().await;

    let payload = json!({
        "buyer_id": Uuid::new_v4(),
        "supplier_id": Uuid::new_v4(),
        "items": [{
            "product_id": Uuid::new_v4(),
            "product_name": "Vaccine vials",
            "sku": "VAX-01",
            "quantity": 10,
            "unit_price": "12.50",
            "temperature_zone": "refrigerated"
        }]
    });
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/orders")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["success"], json!(true));
    let order_id = envelope["data"]["id"].as_str().unwrap().to_string();
    let item_id = envelope["data"]["line_items"][0]["id"].as_str().unwrap().to_string();

    // Skipping a step over HTTP maps to 422.
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/orders/{}/line-items/{}/status", order_id, item_id))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"status": "delivered", "actor": "ops"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown order maps to 404.
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/orders/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
