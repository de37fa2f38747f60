use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product line within an order. Product name/SKU are snapshotted from the
/// catalog at creation; catalog changes never alter an existing order.
///
/// Quantity counters obey `allocated, shipped, delivered, returned ≤ quantity`
/// and `delivered ≤ shipped`; they move only through the defined transition
/// operations. Line items are never deleted — cancellation is a status.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,

    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit: String,
    pub unit_price: Decimal,
    /// Derived: `quantity × unit_price`, recomputed with the order totals.
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(has_many = "super::line_item_event::Entity")]
    TimelineEvents,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::line_item_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
