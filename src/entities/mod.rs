pub mod line_item_event;
pub mod order;
pub mod order_line_item;
pub mod shipment;
pub mod shipment_event;
pub mod shipment_item;
pub mod temperature_alert;
pub mod temperature_reading;
