pub mod orders;
pub mod shipments;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::models::TemperaturePolicy;
use crate::services::{
    LineItemService, OrderLockRegistry, OrderService, ShipmentService, TemperatureMonitor,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
/// All three services share one lock registry so mutations of the same order
/// serialize no matter which surface they enter through.
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub line_items: Arc<LineItemService>,
    pub shipments: Arc<ShipmentService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        temperature_policy: TemperaturePolicy,
    ) -> Self {
        let locks = OrderLockRegistry::new();
        let monitor = TemperatureMonitor::new(temperature_policy);
        Self {
            orders: Arc::new(OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
                locks.clone(),
            )),
            line_items: Arc::new(LineItemService::new(
                db_pool.clone(),
                event_sender.clone(),
                locks.clone(),
            )),
            shipments: Arc::new(ShipmentService::new(db_pool, event_sender, locks, monitor)),
        }
    }
}
