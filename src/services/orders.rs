use crate::{
    db::DbPool,
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
    entities::order_line_item::{
        self, ActiveModel as LineItemActiveModel, Entity as LineItemEntity,
    },
    entities::shipment::{self, Entity as ShipmentEntity},
    entities::shipment_item,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        compute_line_total, compute_order_totals, fulfillment_percentage, LineItemStatus,
        OrderPriority, OrderStatus, TemperatureZone,
    },
    services::shipments::ShipmentResponse,
    services::OrderLockRegistry,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the order service

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub buyer_id: Uuid,
    pub supplier_id: Uuid,
    pub priority: Option<OrderPriority>,
    pub required_by: Option<DateTime<Utc>>,
    #[validate(length(min = 3, max = 3, message = "Currency must be 3 characters"))]
    pub currency: Option<String>,
    pub payment_terms: Option<String>,
    pub tax: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub allow_partial_fulfillment: bool,
    #[validate(range(min = 0, max = 100, message = "Minimum fulfillment must be 0-100"))]
    pub minimum_fulfillment_percentage: Option<i32>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "An order requires at least one line item"))]
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    /// Catalog snapshot: name and SKU are frozen at order creation.
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    pub unit: Option<String>,
    pub unit_price: Decimal,
    pub temperature_zone: Option<TemperatureZone>,
    pub temperature_min_celsius: Option<f64>,
    pub temperature_max_celsius: Option<f64>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefundOrderRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub buyer_id: Uuid,
    pub supplier_id: Uuid,
    pub status: String,
    pub priority: String,
    pub ordered_at: DateTime<Utc>,
    pub required_by: Option<DateTime<Utc>>,
    pub currency: String,
    pub payment_terms: Option<String>,
    pub payment_status: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub allow_partial_fulfillment: bool,
    pub minimum_fulfillment_percentage: Option<i32>,
    pub fulfillment_percentage: i32,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            buyer_id: model.buyer_id,
            supplier_id: model.supplier_id,
            status: model.status,
            priority: model.priority,
            ordered_at: model.ordered_at,
            required_by: model.required_by,
            currency: model.currency,
            payment_terms: model.payment_terms,
            payment_status: model.payment_status,
            subtotal: model.subtotal,
            tax: model.tax,
            shipping_cost: model.shipping_cost,
            discount: model.discount,
            total: model.total,
            allow_partial_fulfillment: model.allow_partial_fulfillment,
            minimum_fulfillment_percentage: model.minimum_fulfillment_percentage,
            fulfillment_percentage: model.fulfillment_percentage,
            notes: model.notes,
            cancel_reason: model.cancel_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit: String,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub status: String,
    pub temperature_zone: Option<String>,
    pub temperature_min_celsius: Option<f64>,
    pub temperature_max_celsius: Option<f64>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub allocated_quantity: i32,
    pub shipped_quantity: i32,
    pub delivered_quantity: i32,
    pub returned_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<order_line_item::Model> for LineItemResponse {
    fn from(model: order_line_item::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            product_name: model.product_name,
            sku: model.sku,
            quantity: model.quantity,
            unit: model.unit,
            unit_price: model.unit_price,
            total_price: model.total_price,
            status: model.status,
            temperature_zone: model.temperature_zone,
            temperature_min_celsius: model.temperature_min_celsius,
            temperature_max_celsius: model.temperature_max_celsius,
            batch_number: model.batch_number,
            expiry_date: model.expiry_date,
            allocated_quantity: model.allocated_quantity,
            shipped_quantity: model.shipped_quantity,
            delivered_quantity: model.delivered_quantity,
            returned_quantity: model.returned_quantity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub line_items: Vec<LineItemResponse>,
    pub shipments: Vec<ShipmentResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Filters for listing orders.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListFilter {
    pub buyer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

/// Outcome of recomputing an order's derived fields inside a transaction.
pub(crate) struct RecomputeOutcome {
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub fulfillment_percentage: u8,
}

pub(crate) fn parse_order_status(order_id: Uuid, raw: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(raw).map_err(|_| {
        ServiceError::InternalError(format!("order {} has unknown status '{}'", order_id, raw))
    })
}

pub(crate) fn parse_line_item_status(
    line_item_id: Uuid,
    raw: &str,
) -> Result<LineItemStatus, ServiceError> {
    LineItemStatus::from_str(raw).map_err(|_| {
        ServiceError::InternalError(format!(
            "line item {} has unknown status '{}'",
            line_item_id, raw
        ))
    })
}

/// Recomputes the order's derived fields (totals, fulfillment percentage,
/// status) from its line items and writes them back with an optimistic
/// version guard. Must run inside the caller's transaction, after all line
/// item changes; `order` is the row as read at the start of that transaction.
///
/// A stale version means another writer slipped in despite the lock registry
/// (a second process, or a caller that skipped the lock): the transaction
/// must be abandoned with `ConcurrentModification`.
pub(crate) async fn recompute_order(
    txn: &DatabaseTransaction,
    order: &order::Model,
) -> Result<RecomputeOutcome, ServiceError> {
    let items = LineItemEntity::find()
        .filter(order_line_item::Column::OrderId.eq(order.id))
        .all(txn)
        .await?;

    let mut statuses = Vec::with_capacity(items.len());
    let mut line_totals = Vec::with_capacity(items.len());
    let mut declared: i64 = 0;
    let mut delivered: i64 = 0;
    for item in &items {
        statuses.push(parse_line_item_status(item.id, &item.status)?);
        line_totals.push(compute_line_total(item.quantity, item.unit_price));
        declared += i64::from(item.quantity);
        delivered += i64::from(item.delivered_quantity);
    }

    let totals = compute_order_totals(line_totals, order.tax, order.shipping_cost, order.discount);
    let percentage = fulfillment_percentage(delivered, declared);
    let old_status = parse_order_status(order.id, &order.status)?;
    let new_status = OrderStatus::derive(old_status, &statuses);

    let result = OrderEntity::update_many()
        .col_expr(order::Column::Status, Expr::value(new_status.to_string()))
        .col_expr(order::Column::Subtotal, Expr::value(totals.subtotal))
        .col_expr(order::Column::Total, Expr::value(totals.total))
        .col_expr(
            order::Column::FulfillmentPercentage,
            Expr::value(i32::from(percentage)),
        )
        .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(order::Column::Version, Expr::value(order.version + 1))
        .filter(order::Column::Id.eq(order.id))
        .filter(order::Column::Version.eq(order.version))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        warn!(order_id = %order.id, version = order.version, "Stale order version during recompute");
        return Err(ServiceError::ConcurrentModification(order.id));
    }

    Ok(RecomputeOutcome {
        old_status,
        new_status,
        fulfillment_percentage: percentage,
    })
}

fn generate_order_number() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", raw[..12].to_uppercase())
}

/// Service for managing orders as an aggregate of line items and shipments.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    locks: OrderLockRegistry,
}

impl OrderService {
    /// Creates a new order service instance
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

    /// Creates an order with its line items in one transaction. Product data
    /// is snapshotted from the request; pricing is derived, never accepted.
    #[instrument(skip(self, request), fields(buyer_id = %request.buyer_id, supplier_id = %request.supplier_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderDetailResponse, ServiceError> {
        request.validate()?;
        for item in &request.items {
            item.validate()?;
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let order_number = generate_order_number();

        let tax = request.tax.unwrap_or_default();
        let shipping_cost = request.shipping_cost.unwrap_or_default();
        let discount = request.discount.unwrap_or_default();
        let line_totals: Vec<Decimal> = request
            .items
            .iter()
            .map(|item| compute_line_total(item.quantity, item.unit_price))
            .collect();
        let totals = compute_order_totals(line_totals.clone(), tax, shipping_cost, discount);

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            buyer_id: Set(request.buyer_id),
            supplier_id: Set(request.supplier_id),
            status: Set(OrderStatus::Pending.to_string()),
            priority: Set(request
                .priority
                .unwrap_or(OrderPriority::Medium)
                .to_string()),
            ordered_at: Set(now),
            required_by: Set(request.required_by),
            currency: Set(request.currency.unwrap_or_else(|| "USD".to_string())),
            payment_terms: Set(request.payment_terms),
            payment_status: Set("unpaid".to_string()),
            subtotal: Set(totals.subtotal),
            tax: Set(tax),
            shipping_cost: Set(shipping_cost),
            discount: Set(discount),
            total: Set(totals.total),
            allow_partial_fulfillment: Set(request.allow_partial_fulfillment),
            minimum_fulfillment_percentage: Set(request.minimum_fulfillment_percentage),
            fulfillment_percentage: Set(0),
            notes: Set(request.notes),
            cancel_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        let mut item_models = Vec::with_capacity(request.items.len());
        for (item, line_total) in request.items.into_iter().zip(line_totals) {
            let item_active_model = LineItemActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(item.product_id),
                product_name: Set(item.product_name),
                sku: Set(item.sku),
                quantity: Set(item.quantity),
                unit: Set(item.unit.unwrap_or_else(|| "each".to_string())),
                unit_price: Set(item.unit_price),
                total_price: Set(line_total),
                status: Set(LineItemStatus::Pending.to_string()),
                temperature_zone: Set(item.temperature_zone.map(|z| z.to_string())),
                temperature_min_celsius: Set(item.temperature_min_celsius),
                temperature_max_celsius: Set(item.temperature_max_celsius),
                batch_number: Set(item.batch_number),
                expiry_date: Set(item.expiry_date),
                allocated_quantity: Set(0),
                shipped_quantity: Set(0),
                delivered_quantity: Set(0),
                returned_quantity: Set(0),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            };
            let item_model = item_active_model.insert(&txn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order line item");
                ServiceError::DatabaseError(e)
            })?;
            item_models.push(item_model);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, order_number = %order_number, item_count = item_models.len(), "Order created successfully");

        if let Err(e) = self.event_sender.send(Event::OrderCreated(order_id)).await {
            warn!(error = %e, order_id = %order_id, "Failed to send order created event");
        }

        Ok(OrderDetailResponse {
            order: order_model.into(),
            line_items: item_models.into_iter().map(Into::into).collect(),
            shipments: Vec::new(),
        })
    }

    /// Retrieves an order with its line items and shipments embedded.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetailResponse, ServiceError> {
        let db = &*self.db_pool;

        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = LineItemEntity::find()
            .filter(order_line_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_line_item::Column::CreatedAt)
            .all(db)
            .await?;

        let shipments = ShipmentEntity::find()
            .filter(shipment::Column::OrderId.eq(order_id))
            .order_by_asc(shipment::Column::CreatedAt)
            .all(db)
            .await?;

        let mut shipment_responses = Vec::with_capacity(shipments.len());
        for shipment_model in shipments {
            let carried = shipment_model
                .find_related(shipment_item::Entity)
                .all(db)
                .await?;
            shipment_responses.push(ShipmentResponse::from_parts(shipment_model, carried));
        }

        Ok(OrderDetailResponse {
            order: order.into(),
            line_items: items.into_iter().map(Into::into).collect(),
            shipments: shipment_responses,
        })
    }

    /// Lists orders with pagination and optional buyer/supplier/status filters.
    #[instrument(skip(self, filter))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
        filter: OrderListFilter,
    ) -> Result<OrderListResponse, ServiceError> {
        let db = &*self.db_pool;
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let mut query = OrderEntity::find().order_by_desc(order::Column::CreatedAt);
        if let Some(buyer_id) = filter.buyer_id {
            query = query.filter(order::Column::BuyerId.eq(buyer_id));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(order::Column::SupplierId.eq(supplier_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status.to_string()));
        }

        let paginator = query.paginate(db, per_page);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page - 1).await?;

        Ok(OrderListResponse {
            orders: orders.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Cancels an order. Rejected once the order is delivered or completed;
    /// line items that already shipped keep their status, everything else is
    /// cancelled with a timeline entry.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        order_id: Uuid,
        request: CancelOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let response = self
            .close_order(order_id, request.reason, OrderStatus::Cancelled)
            .await?;

        if let Err(e) = self.event_sender.send(Event::OrderCancelled(order_id)).await {
            warn!(error = %e, order_id = %order_id, "Failed to send order cancelled event");
        }
        Ok(response)
    }

    /// Refunds an order. Same gate and teardown as cancellation: rejected
    /// once delivered or completed, unshipped line items are cancelled, and
    /// shipped quantities stay tracked to delivery or return. The refund
    /// itself is settled by the payment collaborator.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn refund_order(
        &self,
        order_id: Uuid,
        request: RefundOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let response = self
            .close_order(order_id, request.reason, OrderStatus::Refunded)
            .await?;

        if let Err(e) = self.event_sender.send(Event::OrderRefunded(order_id)).await {
            warn!(error = %e, order_id = %order_id, "Failed to send order refunded event");
        }
        Ok(response)
    }

    /// Shared teardown for cancellation and refund: closes every line item
    /// that has not shipped and moves the order to the given terminal status
    /// under the version guard.
    async fn close_order(
        &self,
        order_id: Uuid,
        reason: Option<String>,
        target: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        let lock = self.locks.lock_for(order_id);
        let _guard = lock.lock().await;

        let db = &*self.db_pool;
        let now = Utc::now();
        let txn = db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let status = parse_order_status(order_id, &order.status)?;
        if !status.can_cancel() {
            return Err(ServiceError::InvalidOperation(format!(
                "Order in status '{}' cannot be {}",
                status, target
            )));
        }

        let items = LineItemEntity::find()
            .filter(order_line_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;

        let mut closed_items = 0usize;
        for item in items {
            let item_status = parse_line_item_status(item.id, &item.status)?;
            if item_status.is_terminal() || item_status.has_shipped() {
                continue;
            }
            crate::services::line_items::append_timeline_entry(
                &txn,
                item.id,
                LineItemStatus::Cancelled,
                "system",
                reason.clone(),
                now,
            )
            .await?;
            let mut item_active: LineItemActiveModel = item.into();
            item_active.status = Set(LineItemStatus::Cancelled.to_string());
            item_active.updated_at = Set(Some(now));
            item_active.update(&txn).await?;
            closed_items += 1;
        }

        let result = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(target.to_string()))
            .col_expr(order::Column::CancelReason, Expr::value(reason.clone()))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .col_expr(order::Column::Version, Expr::value(order.version + 1))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(order.version))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        txn.commit().await?;

        info!(order_id = %order_id, closed_items, status = %target, "Order closed");

        let mut response: OrderResponse = order.into();
        response.status = target.to_string();
        response.cancel_reason = reason;
        response.updated_at = Some(now);
        response.version += 1;
        Ok(response)
    }

    /// Closes the order as completed when the fulfillment policy is met:
    /// 100% delivered, or at least the configured minimum when partial
    /// fulfillment is allowed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn complete_fulfillment(
        &self,
        order_id: Uuid,
    ) -> Result<OrderResponse, ServiceError> {
        let lock = self.locks.lock_for(order_id);
        let _guard = lock.lock().await;

        let db = &*self.db_pool;
        let now = Utc::now();
        let txn = db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let status = parse_order_status(order_id, &order.status)?;
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation(format!(
                "Order in status '{}' cannot be completed",
                status
            )));
        }

        let items = LineItemEntity::find()
            .filter(order_line_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;
        let declared: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();
        let delivered: i64 = items.iter().map(|i| i64::from(i.delivered_quantity)).sum();
        let actual = fulfillment_percentage(delivered, declared);

        let required: u8 = if order.allow_partial_fulfillment {
            order
                .minimum_fulfillment_percentage
                .unwrap_or(100)
                .clamp(0, 100) as u8
        } else {
            100
        };
        if actual < required {
            return Err(ServiceError::FulfillmentThresholdNotMet { required, actual });
        }

        let result = OrderEntity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Completed.to_string()),
            )
            .col_expr(
                order::Column::FulfillmentPercentage,
                Expr::value(i32::from(actual)),
            )
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .col_expr(order::Column::Version, Expr::value(order.version + 1))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(order.version))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        txn.commit().await?;

        info!(order_id = %order_id, fulfillment_percentage = actual, "Order fulfillment completed");

        if let Err(e) = self
            .event_sender
            .send(Event::OrderFulfillmentCompleted {
                order_id,
                fulfillment_percentage: actual,
            })
            .await
        {
            warn!(error = %e, order_id = %order_id, "Failed to send fulfillment completed event");
        }

        let mut response: OrderResponse = order.into();
        response.status = OrderStatus::Completed.to_string();
        response.fulfillment_percentage = i32::from(actual);
        response.updated_at = Some(now);
        response.version += 1;
        Ok(response)
    }
}
