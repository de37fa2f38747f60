mod common;

use assert_matches::assert_matches;
use coldtrack_api::errors::ServiceError;
use coldtrack_api::models::{LineItemStatus, ShipmentStatus};
use coldtrack_api::services::line_items::UpdateLineItemStatusRequest;
use coldtrack_api::services::shipments::RecordTrackingEventRequest;
use common::{line_item, order_request, shipment_request, TestApp};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn tracking(status: ShipmentStatus) -> RecordTrackingEventRequest {
    RecordTrackingEventRequest {
        status,
        description: format!("carrier reported {}", status),
        location: None,
        occurred_at: None,
    }
}

#[tokio::test]
async fn over_allocation_is_rejected_not_clamped() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 100, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    shipments
        .create_shipment(shipment_request(order_id, vec![(item, 30)]))
        .await
        .unwrap();

    // 30 already shipped; 80 more would exceed the declared 100.
    let err = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 80)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::OverAllocation(_));

    // The rejected shipment wrote nothing.
    let after = orders.get_order(order_id).await.unwrap();
    assert_eq!(after.line_items[0].shipped_quantity, 30);
    assert_eq!(after.shipments.len(), 1);

    // The exact remainder still fits.
    shipments
        .create_shipment(shipment_request(order_id, vec![(item, 70)]))
        .await
        .unwrap();
    let full = orders.get_order(order_id).await.unwrap();
    assert_eq!(full.line_items[0].shipped_quantity, 100);
}

#[tokio::test]
async fn zero_quantity_shipments_are_rejected() {
    let app = TestApp::new().await;
    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();

    let err = app
        .state
        .services
        .shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 0)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn duplicate_line_items_in_one_shipment_are_rejected() {
    let app = TestApp::new().await;
    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let item = detail.line_items[0].id;

    let err = app
        .state
        .services
        .shipments
        .create_shipment(shipment_request(detail.order.id, vec![(item, 3), (item, 4)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn implicit_advance_records_one_timeline_entry_per_step() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let line_items = &app.state.services.line_items;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    // Advance to confirmed explicitly, then let the shipment walk the rest.
    line_items
        .update_status(
            order_id,
            item,
            UpdateLineItemStatusRequest {
                status: LineItemStatus::Confirmed,
                actor: "ops".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    app.state
        .services
        .shipments
        .create_shipment(shipment_request(order_id, vec![(item, 10)]))
        .await
        .unwrap();

    let timeline = line_items.get_timeline(order_id, item).await.unwrap();
    let statuses: Vec<&str> = timeline.iter().map(|e| e.status.as_str()).collect();
    assert_eq!(
        statuses,
        vec!["confirmed", "allocated", "picked", "packed", "shipped"]
    );
    // Implicit steps are attributed to the system, not an operator.
    for entry in &timeline[1..] {
        assert_eq!(entry.actor, "system");
        assert!(entry
            .notes
            .as_deref()
            .is_some_and(|n| n.starts_with("advanced by shipment SHP-")));
    }
}

#[tokio::test]
async fn partial_delivery_caps_delivered_at_shipped() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let shipments = &app.state.services.shipments;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    let shipment = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 4)]))
        .await
        .unwrap();
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();

    let after = orders.get_order(order_id).await.unwrap();
    let line = &after.line_items[0];
    assert_eq!(line.shipped_quantity, 4);
    assert_eq!(line.delivered_quantity, 4);
    // Only part of the declared quantity arrived, so the item stays shipped.
    assert_eq!(line.status, "shipped");
    assert_eq!(after.order.status, "partially_shipped");
    assert_eq!(after.order.fulfillment_percentage, 40);
}

#[tokio::test]
async fn whole_line_delivery_after_partial_shipment_pulls_shipped_along() {
    let app = TestApp::new().await;
    let orders = &app.state.services.orders;
    let line_items = &app.state.services.line_items;

    let detail = orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    // A partial shipment advances the item to shipped with 4 of 10 on the way.
    app.state
        .services
        .shipments
        .create_shipment(shipment_request(order_id, vec![(item, 4)]))
        .await
        .unwrap();

    // An operator then marks the whole line delivered (a delivery recorded
    // outside any tracked shipment). The earlier counters move with it.
    let updated = line_items
        .update_status(
            order_id,
            item,
            UpdateLineItemStatusRequest {
                status: LineItemStatus::Delivered,
                actor: "ops".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.delivered_quantity, 10);
    assert_eq!(updated.shipped_quantity, 10);
    assert_eq!(updated.allocated_quantity, 10);
    assert!(updated.delivered_quantity <= updated.shipped_quantity);

    let after = orders.get_order(order_id).await.unwrap();
    assert_eq!(after.order.status, "delivered");
    assert_eq!(after.order.fulfillment_percentage, 100);
}

#[tokio::test]
async fn tracking_events_never_regress_shipment_status() {
    let app = TestApp::new().await;
    let shipments = &app.state.services.shipments;

    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 5, dec!(1.00))]))
        .await
        .unwrap();
    let shipment = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 5)]))
        .await
        .unwrap();

    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::InTransit))
        .await
        .unwrap();
    let err = shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Dispatched))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });

    // Terminal shipments accept no further events.
    shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Delivered))
        .await
        .unwrap();
    let err = shipments
        .record_tracking_event(shipment.id, tracking(ShipmentStatus::Failed))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn tracking_events_are_listed_oldest_first() {
    let app = TestApp::new().await;
    let shipments = &app.state.services.shipments;

    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 5, dec!(1.00))]))
        .await
        .unwrap();
    let shipment = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(detail.line_items[0].id, 5)]))
        .await
        .unwrap();

    for status in [
        ShipmentStatus::Dispatched,
        ShipmentStatus::InTransit,
        ShipmentStatus::OutForDelivery,
    ] {
        shipments
            .record_tracking_event(shipment.id, tracking(status))
            .await
            .unwrap();
    }

    let events = shipments.list_tracking_events(shipment.id).await.unwrap();
    let statuses: Vec<&str> = events.iter().map(|e| e.status.as_str()).collect();
    assert_eq!(statuses, vec!["dispatched", "in_transit", "out_for_delivery"]);
}

#[tokio::test]
async fn shipments_are_listed_per_order_in_creation_order() {
    let app = TestApp::new().await;
    let shipments = &app.state.services.shipments;

    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    let first = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 3)]))
        .await
        .unwrap();
    let second = shipments
        .create_shipment(shipment_request(order_id, vec![(item, 2)]))
        .await
        .unwrap();

    let listed = shipments.list_for_order(order_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
    assert!(listed.iter().all(|s| s.shipment_number.starts_with("SHP-")));
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let app = TestApp::new().await;
    let shipments = &app.state.services.shipments;

    let err = shipments.get_shipment(Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 5, dec!(1.00))]))
        .await
        .unwrap();
    // A line item from a different order is not shippable here.
    let err = shipments
        .create_shipment(shipment_request(detail.order.id, vec![(Uuid::new_v4(), 1)]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn concurrent_shipments_cannot_jointly_over_allocate() {
    let app = TestApp::new().await;
    let detail = app
        .state
        .services
        .orders
        .create_order(order_request(vec![line_item("SKU-A", 10, dec!(1.00))]))
        .await
        .unwrap();
    let order_id = detail.order.id;
    let item = detail.line_items[0].id;

    // 8 + 8 > 10: at most one of the two may commit.
    let left = app.state.services.shipments.clone();
    let right = app.state.services.shipments.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            left.create_shipment(shipment_request(order_id, vec![(item, 8)]))
                .await
        }),
        tokio::spawn(async move {
            right
                .create_shipment(shipment_request(order_id, vec![(item, 8)]))
                .await
        }),
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    let ok = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1, "exactly one concurrent shipment must succeed");
    let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
    assert_matches!(
        loser.as_ref().unwrap_err(),
        ServiceError::OverAllocation(_) | ServiceError::ConcurrentModification(_)
    );

    let after = app.state.services.orders.get_order(order_id).await.unwrap();
    assert_eq!(after.line_items[0].shipped_quantity, 8);
    assert_eq!(after.shipments.len(), 1);
}
