pub mod fulfillment;
pub mod line_item_status;
pub mod order_status;
pub mod shipment_status;
pub mod temperature;

pub use fulfillment::{compute_line_total, compute_order_totals, fulfillment_percentage};
pub use line_item_status::LineItemStatus;
pub use order_status::{OrderPriority, OrderStatus};
pub use shipment_status::ShipmentStatus;
pub use temperature::{
    AlertSeverity, TemperaturePolicy, TemperatureUnit, TemperatureZone, ZoneThreshold,
};
