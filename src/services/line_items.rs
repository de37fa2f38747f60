use crate::{
    db::DbPool,
    entities::line_item_event::{
        self, ActiveModel as TimelineActiveModel, Entity as TimelineEntity,
    },
    entities::order::Entity as OrderEntity,
    entities::order_line_item::{
        self, ActiveModel as LineItemActiveModel, Entity as LineItemEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::LineItemStatus,
    services::orders::{
        parse_line_item_status, recompute_order, LineItemResponse,
    },
    services::OrderLockRegistry,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLineItemStatusRequest {
    pub status: LineItemStatus,
    #[validate(length(min = 1, message = "Actor is required"))]
    pub actor: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimelineEventResponse {
    pub id: Uuid,
    pub line_item_id: Uuid,
    pub status: String,
    pub actor: String,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl From<line_item_event::Model> for TimelineEventResponse {
    fn from(model: line_item_event::Model) -> Self {
        Self {
            id: model.id,
            line_item_id: model.line_item_id,
            status: model.status,
            actor: model.actor,
            notes: model.notes,
            occurred_at: model.occurred_at,
        }
    }
}

/// Appends one row to a line item's status timeline. Every status step goes
/// through here, explicit or implicit, so the audit trail is complete.
pub(crate) async fn append_timeline_entry<C>(
    conn: &C,
    line_item_id: Uuid,
    status: LineItemStatus,
    actor: &str,
    notes: Option<String>,
    occurred_at: DateTime<Utc>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let entry = TimelineActiveModel {
        id: Set(Uuid::new_v4()),
        line_item_id: Set(line_item_id),
        status: Set(status.to_string()),
        actor: Set(actor.to_string()),
        notes: Set(notes),
        occurred_at: Set(occurred_at),
    };
    entry.insert(conn).await?;
    Ok(())
}

/// Service for advancing individual line items through their status chain.
#[derive(Clone)]
pub struct LineItemService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    locks: OrderLockRegistry,
}

impl LineItemService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        locks: OrderLockRegistry,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
        }
    }

    /// Moves a line item one step along its status chain. Non-forward
    /// transitions are rejected with `InvalidTransition`; multi-step advances
    /// happen only through shipment creation, which records each step.
    ///
    /// Matching quantity counters move with the status: the whole declared
    /// quantity is allocated/shipped/delivered on the corresponding step, and
    /// a return moves the delivered quantity into returned.
    #[instrument(skip(self, request), fields(order_id = %order_id, line_item_id = %line_item_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        line_item_id: Uuid,
        request: UpdateLineItemStatusRequest,
    ) -> Result<LineItemResponse, ServiceError> {
        request.validate()?;

        let lock = self.locks.lock_for(order_id);
        let _guard = lock.lock().await;

        let db = &*self.db_pool;
        let now = Utc::now();
        let txn = db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let item = LineItemEntity::find_by_id(line_item_id)
            .filter(order_line_item::Column::OrderId.eq(order_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Line item {} not found on order {}",
                    line_item_id, order_id
                ))
            })?;

        let current = parse_line_item_status(item.id, &item.status)?;
        let target = request.status;
        if !current.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        append_timeline_entry(
            &txn,
            line_item_id,
            target,
            &request.actor,
            request.notes.clone(),
            now,
        )
        .await?;

        let declared = item.quantity;
        let delivered_before = item.delivered_quantity;
        let mut item_active: LineItemActiveModel = item.into();
        item_active.status = Set(target.to_string());
        item_active.updated_at = Set(Some(now));
        // Whole-line movement: the declared quantity moves with the status.
        // Later counters pull the earlier ones along so `delivered ≤ shipped`
        // holds even when a partial shipment advanced the item first.
        match target {
            LineItemStatus::Allocated => item_active.allocated_quantity = Set(declared),
            LineItemStatus::Shipped => {
                item_active.allocated_quantity = Set(declared);
                item_active.shipped_quantity = Set(declared);
            }
            LineItemStatus::Delivered => {
                item_active.allocated_quantity = Set(declared);
                item_active.shipped_quantity = Set(declared);
                item_active.delivered_quantity = Set(declared);
            }
            LineItemStatus::Returned => item_active.returned_quantity = Set(delivered_before),
            _ => {}
        }
        let updated_item = item_active.update(&txn).await?;

        let outcome = recompute_order(&txn, &order).await?;

        txn.commit().await?;

        info!(
            order_id = %order_id,
            line_item_id = %line_item_id,
            from = %current,
            to = %target,
            "Line item status updated"
        );

        if outcome.old_status != outcome.new_status {
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

        Ok(updated_item.into())
    }

    /// Returns the append-only status timeline of a line item, oldest first.
    #[instrument(skip(self), fields(order_id = %order_id, line_item_id = %line_item_id))]
    pub async fn get_timeline(
        &self,
        order_id: Uuid,
        line_item_id: Uuid,
    ) -> Result<Vec<TimelineEventResponse>, ServiceError> {
        let db = &*self.db_pool;

        LineItemEntity::find_by_id(line_item_id)
            .filter(order_line_item::Column::OrderId.eq(order_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Line item {} not found on order {}",
                    line_item_id, order_id
                ))
            })?;

        let events = TimelineEntity::find()
            .filter(line_item_event::Column::LineItemId.eq(line_item_id))
            .order_by_asc(line_item_event::Column::OccurredAt)
            .all(db)
            .await?;

        Ok(events.into_iter().map(Into::into).collect())
    }
}
