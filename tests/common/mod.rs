#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use coldtrack_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    models::TemperaturePolicy,
    services::orders::{CreateOrderItemRequest, CreateOrderRequest},
    services::shipments::{CreateShipmentRequest, ShipmentItemRequest},
    AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Test harness backed by a scratch SQLite database. Each instance gets its
/// own database file in a temp directory, dropped with the harness.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_policy(TemperaturePolicy::default()).await
    }

    pub async fn with_policy(policy: TemperaturePolicy) -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("coldtrack_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.temperature = policy;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let db_arc = Arc::new(pool);
        let services = AppServices::new(
            db_arc.clone(),
            Arc::new(event_sender.clone()),
            cfg.temperature.clone(),
        );
        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };
        let router = Router::new()
            .nest("/api/v1", coldtrack_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            state,
            router,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// One line item fixture with defaults suitable for most tests.
pub fn line_item(sku: &str, quantity: i32, unit_price: Decimal) -> CreateOrderItemRequest {
    CreateOrderItemRequest {
        product_id: Uuid::new_v4(),
        product_name: format!("Product {}", sku),
        sku: sku.to_string(),
        quantity,
        unit: None,
        unit_price,
        temperature_zone: None,
        temperature_min_celsius: None,
        temperature_max_celsius: None,
        batch_number: None,
        expiry_date: None,
    }
}

/// An order fixture for the given items; partial fulfillment disabled.
pub fn order_request(items: Vec<CreateOrderItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        buyer_id: Uuid::new_v4(),
        supplier_id: Uuid::new_v4(),
        priority: None,
        required_by: None,
        currency: None,
        payment_terms: None,
        tax: Some(dec!(0)),
        shipping_cost: Some(dec!(0)),
        discount: Some(dec!(0)),
        allow_partial_fulfillment: false,
        minimum_fulfillment_percentage: None,
        notes: None,
        items,
    }
}

/// A shipment fixture carrying the given (line item, quantity) pairs.
pub fn shipment_request(order_id: Uuid, items: Vec<(Uuid, i32)>) -> CreateShipmentRequest {
    CreateShipmentRequest {
        order_id,
        carrier_name: "Polar Express Logistics".to_string(),
        tracking_number: None,
        pickup_address: "1 Depot Way".to_string(),
        delivery_address: "99 Receiving Dock".to_string(),
        estimated_pickup: None,
        estimated_delivery: None,
        items: items
            .into_iter()
            .map(|(line_item_id, quantity)| ShipmentItemRequest {
                line_item_id,
                quantity,
            })
            .collect(),
    }
}
