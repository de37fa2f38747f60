use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events this engine emits after a successful commit. A notification
/// collaborator subscribes to these; the engine itself never sends messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderCancelled(Uuid),
    OrderRefunded(Uuid),
    OrderFulfillmentCompleted {
        order_id: Uuid,
        fulfillment_percentage: u8,
    },
    ShipmentCreated {
        shipment_id: Uuid,
        order_id: Uuid,
    },
    ShipmentStatusChanged {
        shipment_id: Uuid,
        old_status: String,
        new_status: String,
    },
    ShipmentDelivered {
        shipment_id: Uuid,
        order_id: Uuid,
    },
    TemperatureAlertRaised {
        shipment_id: Uuid,
        reading_id: Uuid,
        severity: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; failures are reported, never fatal to the mutation
    /// that produced the event.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumer task: logs every event. External subscribers (notification
/// dispatch, schedulers) hook in here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(%order_id, %old_status, %new_status, "order.status_changed"),
            Event::ShipmentDelivered {
                shipment_id,
                order_id,
            } => info!(%shipment_id, %order_id, "shipment.delivered"),
            Event::TemperatureAlertRaised {
                shipment_id,
                reading_id,
                severity,
            } => info!(%shipment_id, %reading_id, %severity, "temperature.alert_raised"),
            other => info!(event = ?other, "domain event"),
        }
    }
    info!("Event channel closed, stopping event processor");
}
