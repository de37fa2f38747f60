use crate::{
    db::DbPool,
    entities::order::Entity as OrderEntity,
    entities::order_line_item::{
        self, ActiveModel as LineItemActiveModel, Entity as LineItemEntity,
    },
    entities::shipment::{self, ActiveModel as ShipmentActiveModel, Entity as ShipmentEntity},
    entities::shipment_event::{
        self, ActiveModel as TrackingEventActiveModel, Entity as TrackingEventEntity,
    },
    entities::shipment_item::{
        self, ActiveModel as ShipmentItemActiveModel, Entity as ShipmentItemEntity,
    },
    entities::temperature_alert::{self, ActiveModel as AlertActiveModel, Entity as AlertEntity},
    entities::temperature_reading::{
        self, ActiveModel as ReadingActiveModel, Entity as ReadingEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{LineItemStatus, ShipmentStatus, TemperatureUnit, TemperatureZone},
    services::line_items::append_timeline_entry,
    services::orders::{parse_line_item_status, parse_order_status, recompute_order},
    services::temperature::TemperatureMonitor,
    services::OrderLockRegistry,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    pub order_id: Uuid,
    #[validate(length(min = 1, message = "Carrier name is required"))]
    pub carrier_name: String,
    pub tracking_number: Option<String>,
    #[validate(length(min = 1, message = "Pickup address is required"))]
    pub pickup_address: String,
    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,
    pub estimated_pickup: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "A shipment requires at least one item"))]
    pub items: Vec<ShipmentItemRequest>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ShipmentItemRequest {
    pub line_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecordTrackingEventRequest {
    pub status: ShipmentStatus,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub location: Option<String>,
    /// Carrier-reported time; defaults to ingest time when absent.
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RecordReadingRequest {
    pub value: f64,
    pub unit: TemperatureUnit,
    pub zone: TemperatureZone,
    pub device_id: Option<String>,
    pub location: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentItemResponse {
    pub id: Uuid,
    pub line_item_id: Uuid,
    pub quantity: i32,
}

impl From<shipment_item::Model> for ShipmentItemResponse {
    fn from(model: shipment_item::Model) -> Self {
        Self {
            id: model.id,
            line_item_id: model.line_item_id,
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub shipment_number: String,
    pub carrier_name: String,
    pub tracking_number: Option<String>,
    pub status: String,
    pub pickup_address: String,
    pub delivery_address: String,
    pub estimated_pickup: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_pickup: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub items: Vec<ShipmentItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShipmentResponse {
    pub(crate) fn from_parts(model: shipment::Model, items: Vec<shipment_item::Model>) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            shipment_number: model.shipment_number,
            carrier_name: model.carrier_name,
            tracking_number: model.tracking_number,
            status: model.status,
            pickup_address: model.pickup_address,
            delivery_address: model.delivery_address,
            estimated_pickup: model.estimated_pickup,
            estimated_delivery: model.estimated_delivery,
            actual_pickup: model.actual_pickup,
            actual_delivery: model.actual_delivery,
            items: items.into_iter().map(Into::into).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackingEventResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub status: String,
    pub description: String,
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl From<shipment_event::Model> for TrackingEventResponse {
    fn from(model: shipment_event::Model) -> Self {
        Self {
            id: model.id,
            shipment_id: model.shipment_id,
            status: model.status,
            description: model.description,
            location: model.location,
            occurred_at: model.occurred_at,
            recorded_at: model.recorded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemperatureReadingResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub value: f64,
    pub unit: String,
    pub zone: String,
    pub device_id: Option<String>,
    pub location: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<temperature_reading::Model> for TemperatureReadingResponse {
    fn from(model: temperature_reading::Model) -> Self {
        Self {
            id: model.id,
            shipment_id: model.shipment_id,
            value: model.value,
            unit: model.unit,
            zone: model.zone,
            device_id: model.device_id,
            location: model.location,
            recorded_at: model.recorded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemperatureAlertResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub reading_id: Uuid,
    pub severity: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<temperature_alert::Model> for TemperatureAlertResponse {
    fn from(model: temperature_alert::Model) -> Self {
        Self {
            id: model.id,
            shipment_id: model.shipment_id,
            reading_id: model.reading_id,
            severity: model.severity,
            message: model.message,
            occurred_at: model.occurred_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordReadingResponse {
    pub reading: TemperatureReadingResponse,
    /// Present only when the reading violated its zone threshold.
    pub alert: Option<TemperatureAlertResponse>,
}

fn generate_shipment_number() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("SHP-{}", raw[..12].to_uppercase())
}

fn parse_shipment_status(shipment_id: Uuid, raw: &str) -> Result<ShipmentStatus, ServiceError> {
    ShipmentStatus::from_str(raw).map_err(|_| {
        ServiceError::InternalError(format!(
            "shipment {} has unknown status '{}'",
            shipment_id, raw
        ))
    })
}

/// Service for consignments: creation against owned line-item quantities,
/// carrier tracking events, and cold-chain readings.
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    locks: OrderLockRegistry,
    monitor: TemperatureMonitor,
}

impl ShipmentService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        locks: OrderLockRegistry,
        monitor: TemperatureMonitor,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
            monitor,
        }
    }

    /// Creates a shipment carrying quantities of the order's line items.
    ///
    /// Every carried quantity must fit the remaining unshipped quantity of its
    /// line item; any excess rejects the whole shipment with `OverAllocation`.
    /// Each referenced line item is advanced to `shipped` without skipping,
    /// one timeline entry per intermediate step.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_shipment(
        &self,
        request: CreateShipmentRequest,
    ) -> Result<ShipmentResponse, ServiceError> {
        request.validate()?;

        let mut seen = HashSet::new();
        for item in &request.items {
            if item.quantity <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Line item {}: shipped quantity must be positive",
                    item.line_item_id
                )));
            }
            if !seen.insert(item.line_item_id) {
                return Err(ServiceError::ValidationError(format!(
                    "Line item {} appears more than once in the shipment",
                    item.line_item_id
                )));
            }
        }

        let order_id = request.order_id;
        let lock = self.locks.lock_for(order_id);
        let _guard = lock.lock().await;

        let db = &*self.db_pool;
        let now = Utc::now();
        let shipment_id = Uuid::new_v4();
        let shipment_number = generate_shipment_number();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to start transaction for shipment creation");
            ServiceError::DatabaseError(e)
        })?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let order_status = parse_order_status(order_id, &order.status)?;
        if order_status.is_terminal() {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot ship against an order in status '{}'",
                order_status
            )));
        }

        // Validate every pair before writing anything.
        let mut line_items = Vec::with_capacity(request.items.len());
        for pair in &request.items {
            let item = LineItemEntity::find_by_id(pair.line_item_id)
                .filter(order_line_item::Column::OrderId.eq(order_id))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Line item {} not found on order {}",
                        pair.line_item_id, order_id
                    ))
                })?;

            let status = parse_line_item_status(item.id, &item.status)?;
            if matches!(status, LineItemStatus::Cancelled | LineItemStatus::Returned) {
                return Err(ServiceError::InvalidOperation(format!(
                    "Line item {} is {} and cannot be shipped",
                    item.id, status
                )));
            }

            let remaining = item.quantity - item.shipped_quantity;
            if pair.quantity > remaining {
                return Err(ServiceError::OverAllocation(format!(
                    "Line item {}: {} already shipped of {}, cannot ship {} more",
                    item.id, item.shipped_quantity, item.quantity, pair.quantity
                )));
            }

            line_items.push((item, status, pair.quantity));
        }

        let shipment_active_model = ShipmentActiveModel {
            id: Set(shipment_id),
            order_id: Set(order_id),
            shipment_number: Set(shipment_number.clone()),
            carrier_name: Set(request.carrier_name),
            tracking_number: Set(request.tracking_number),
            status: Set(ShipmentStatus::Preparing.to_string()),
            pickup_address: Set(request.pickup_address),
            delivery_address: Set(request.delivery_address),
            estimated_pickup: Set(request.estimated_pickup),
            estimated_delivery: Set(request.estimated_delivery),
            actual_pickup: Set(None),
            actual_delivery: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };
        let shipment_model = shipment_active_model.insert(&txn).await?;

        let mut carried = Vec::with_capacity(line_items.len());
        for (item, status, quantity) in line_items {
            let shipment_item = ShipmentItemActiveModel {
                id: Set(Uuid::new_v4()),
                shipment_id: Set(shipment_id),
                line_item_id: Set(item.id),
                quantity: Set(quantity),
            };
            carried.push(shipment_item.insert(&txn).await?);

            // Walk the status chain to shipped, one timeline entry per step.
            // Strictly increasing timestamps keep the timeline ordered.
            let path = status.path_to(LineItemStatus::Shipped);
            for (idx, step) in path.iter().enumerate() {
                append_timeline_entry(
                    &txn,
                    item.id,
                    *step,
                    "system",
                    Some(format!("advanced by shipment {}", shipment_number)),
                    now + Duration::milliseconds(idx as i64),
                )
                .await?;
            }

            let shipped_so_far = item.shipped_quantity;
            let mut item_active: LineItemActiveModel = item.into();
            item_active.shipped_quantity = Set(shipped_so_far + quantity);
            if let Some(final_status) = path.last() {
                item_active.status = Set(final_status.to_string());
            }
            item_active.updated_at = Set(Some(now));
            item_active.update(&txn).await?;
        }

        let outcome = recompute_order(&txn, &order).await?;

        txn.commit().await?;

        info!(
            shipment_id = %shipment_id,
            order_id = %order_id,
            shipment_number = %shipment_number,
            item_count = carried.len(),
            "Shipment created"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::ShipmentCreated {
                shipment_id,
                order_id,
            })
            .await
        {
            warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment created event");
        }
        self.emit_order_status_change(order_id, &outcome).await;

        Ok(ShipmentResponse::from_parts(shipment_model, carried))
    }

    /// Records a carrier tracking event and advances the shipment status.
    /// Delivery stamps `actual_delivery` and moves the carried quantities
    /// into each line item's delivered count, capped at what was shipped.
    #[instrument(skip(self, request), fields(shipment_id = %shipment_id, new_status = %request.status))]
    pub async fn record_tracking_event(
        &self,
        shipment_id: Uuid,
        request: RecordTrackingEventRequest,
    ) -> Result<TrackingEventResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        // Resolve the order before taking its lock.
        let order_id = ShipmentEntity::find_by_id(shipment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
            })?
            .order_id;

        let lock = self.locks.lock_for(order_id);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let occurred_at = request.occurred_at.unwrap_or(now);
        let txn = db.begin().await?;

        let shipment = ShipmentEntity::find_by_id(shipment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
            })?;

        let current = parse_shipment_status(shipment_id, &shipment.status)?;
        let target = request.status;
        if !current.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        let event_active_model = TrackingEventActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(shipment_id),
            status: Set(target.to_string()),
            description: Set(request.description),
            location: Set(request.location),
            occurred_at: Set(occurred_at),
            recorded_at: Set(now),
        };
        let event_model = event_active_model.insert(&txn).await?;

        let had_pickup = shipment.actual_pickup.is_some();
        let mut shipment_active: ShipmentActiveModel = shipment.into();
        shipment_active.status = Set(target.to_string());
        shipment_active.updated_at = Set(Some(now));
        if target == ShipmentStatus::Dispatched && !had_pickup {
            shipment_active.actual_pickup = Set(Some(occurred_at));
        }
        if target == ShipmentStatus::Delivered {
            shipment_active.actual_delivery = Set(Some(occurred_at));
        }
        shipment_active.update(&txn).await?;

        let mut outcome = None;
        if target == ShipmentStatus::Delivered {
            let order = OrderEntity::find_by_id(order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Order {} not found", order_id))
                })?;
            self.apply_delivery(&txn, shipment_id, now).await?;
            outcome = Some(recompute_order(&txn, &order).await?);
        }

        txn.commit().await?;

        info!(
            shipment_id = %shipment_id,
            order_id = %order_id,
            from = %current,
            to = %target,
            "Shipment tracking event recorded"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::ShipmentStatusChanged {
                shipment_id,
                old_status: current.to_string(),
                new_status: target.to_string(),
            })
            .await
        {
            warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment status changed event");
        }
        if target == ShipmentStatus::Delivered {
            if let Err(e) = self
                .event_sender
                .send(Event::ShipmentDelivered {
                    shipment_id,
                    order_id,
                })
                .await
            {
                warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment delivered event");
            }
        }
        if let Some(outcome) = outcome {
            self.emit_order_status_change(order_id, &outcome).await;
        }

        Ok(event_model.into())
    }

    /// Moves each carried quantity into the line item's delivered count and
    /// marks fully delivered items as delivered.
    async fn apply_delivery(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        shipment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let carried = ShipmentItemEntity::find()
            .filter(shipment_item::Column::ShipmentId.eq(shipment_id))
            .all(txn)
            .await?;

        for pair in carried {
            let item = LineItemEntity::find_by_id(pair.line_item_id)
                .one(txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "shipment {} references missing line item {}",
                        shipment_id, pair.line_item_id
                    ))
                })?;

            let status = parse_line_item_status(item.id, &item.status)?;
            let delivered = (item.delivered_quantity + pair.quantity).min(item.shipped_quantity);
            let fully_delivered = delivered == item.quantity;

            if fully_delivered && status == LineItemStatus::Shipped {
                append_timeline_entry(
                    txn,
                    item.id,
                    LineItemStatus::Delivered,
                    "carrier",
                    None,
                    now,
                )
                .await?;
            }

            let quantity = item.quantity;
            let mut item_active: LineItemActiveModel = item.into();
            item_active.delivered_quantity = Set(delivered);
            if fully_delivered && status == LineItemStatus::Shipped {
                item_active.status = Set(LineItemStatus::Delivered.to_string());
            }
            item_active.updated_at = Set(Some(now));
            item_active.update(txn).await?;

            debug_assert!(delivered <= quantity);
        }

        Ok(())
    }

    /// Appends a temperature reading and, when it violates the zone policy,
    /// an alert — atomically, without touching the order row. Violations are
    /// data, not errors: the reading is always accepted.
    #[instrument(skip(self, request), fields(shipment_id = %shipment_id, zone = %request.zone))]
    pub async fn record_temperature_reading(
        &self,
        shipment_id: Uuid,
        request: RecordReadingRequest,
    ) -> Result<RecordReadingResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        let recorded_at = request.recorded_at.unwrap_or(now);

        let txn = db.begin().await?;

        ShipmentEntity::find_by_id(shipment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
            })?;

        let reading_id = Uuid::new_v4();
        let reading_active_model = ReadingActiveModel {
            id: Set(reading_id),
            shipment_id: Set(shipment_id),
            value: Set(request.value),
            unit: Set(request.unit.to_string()),
            zone: Set(request.zone.to_string()),
            device_id: Set(request.device_id),
            location: Set(request.location),
            recorded_at: Set(recorded_at),
        };
        let reading_model = reading_active_model.insert(&txn).await?;

        let mut alert_model = None;
        if let Some(draft) = self
            .monitor
            .evaluate(request.value, request.unit, request.zone)
        {
            let alert_active_model = AlertActiveModel {
                id: Set(Uuid::new_v4()),
                shipment_id: Set(shipment_id),
                reading_id: Set(reading_id),
                severity: Set(draft.severity.to_string()),
                message: Set(draft.message),
                occurred_at: Set(recorded_at),
            };
            alert_model = Some(alert_active_model.insert(&txn).await?);
        }

        txn.commit().await?;

        if let Some(alert) = &alert_model {
            info!(
                shipment_id = %shipment_id,
                reading_id = %reading_id,
                severity = %alert.severity,
                "Temperature alert raised"
            );
            if let Err(e) = self
                .event_sender
                .send(Event::TemperatureAlertRaised {
                    shipment_id,
                    reading_id,
                    severity: alert.severity.clone(),
                })
                .await
            {
                warn!(error = %e, shipment_id = %shipment_id, "Failed to send temperature alert event");
            }
        }

        Ok(RecordReadingResponse {
            reading: reading_model.into(),
            alert: alert_model.map(Into::into),
        })
    }

    /// Retrieves one shipment with its carried items.
    #[instrument(skip(self), fields(shipment_id = %shipment_id))]
    pub async fn get_shipment(&self, shipment_id: Uuid) -> Result<ShipmentResponse, ServiceError> {
        let db = &*self.db_pool;

        let shipment = ShipmentEntity::find_by_id(shipment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
            })?;

        let items = ShipmentItemEntity::find()
            .filter(shipment_item::Column::ShipmentId.eq(shipment_id))
            .all(db)
            .await?;

        Ok(ShipmentResponse::from_parts(shipment, items))
    }

    /// Lists an order's shipments in creation order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<ShipmentResponse>, ServiceError> {
        let db = &*self.db_pool;

        OrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let shipments = ShipmentEntity::find()
            .filter(shipment::Column::OrderId.eq(order_id))
            .order_by_asc(shipment::Column::CreatedAt)
            .all(db)
            .await?;

        let mut responses = Vec::with_capacity(shipments.len());
        for shipment_model in shipments {
            let items = ShipmentItemEntity::find()
                .filter(shipment_item::Column::ShipmentId.eq(shipment_model.id))
                .all(db)
                .await?;
            responses.push(ShipmentResponse::from_parts(shipment_model, items));
        }
        Ok(responses)
    }

    /// Lists a shipment's tracking events, oldest first.
    #[instrument(skip(self), fields(shipment_id = %shipment_id))]
    pub async fn list_tracking_events(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<TrackingEventResponse>, ServiceError> {
        let db = &*self.db_pool;
        self.ensure_shipment_exists(shipment_id).await?;

        let events = TrackingEventEntity::find()
            .filter(shipment_event::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(shipment_event::Column::RecordedAt)
            .all(db)
            .await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Lists a shipment's temperature readings, oldest first.
    #[instrument(skip(self), fields(shipment_id = %shipment_id))]
    pub async fn list_readings(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<TemperatureReadingResponse>, ServiceError> {
        let db = &*self.db_pool;
        self.ensure_shipment_exists(shipment_id).await?;

        let readings = ReadingEntity::find()
            .filter(temperature_reading::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(temperature_reading::Column::RecordedAt)
            .all(db)
            .await?;
        Ok(readings.into_iter().map(Into::into).collect())
    }

    /// Lists a shipment's temperature alerts, oldest first.
    #[instrument(skip(self), fields(shipment_id = %shipment_id))]
    pub async fn list_alerts(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<TemperatureAlertResponse>, ServiceError> {
        let db = &*self.db_pool;
        self.ensure_shipment_exists(shipment_id).await?;

        let alerts = AlertEntity::find()
            .filter(temperature_alert::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(temperature_alert::Column::OccurredAt)
            .all(db)
            .await?;
        Ok(alerts.into_iter().map(Into::into).collect())
    }

    async fn ensure_shipment_exists(&self, shipment_id: Uuid) -> Result<(), ServiceError> {
        ShipmentEntity::find_by_id(shipment_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
            })?;
        Ok(())
    }

    async fn emit_order_status_change(
        &self,
        order_id: Uuid,
        outcome: &crate::services::orders::RecomputeOutcome,
    ) {
        if outcome.old_status == outcome.new_status {
            return;
        }
        if let Err(e) = self
            .event_sender
            .send(Event::OrderStatusChanged {
                order_id,
                old_status: outcome.old_status.to_string(),
                new_status: outcome.new_status.to_string(),
            })
            .await
        {
            warn!(error = %e, order_id = %order_id, "Failed to send order status changed event");
        }
    }
}
