use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `orders` table: aggregate root for line items and shipments.
///
/// `status`, the money fields, and `fulfillment_percentage` are derived and
/// recomputed inside every mutating transaction; `version` is the optimistic
/// concurrency guard for the whole aggregate.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-readable identifier, assigned once at creation.
    pub order_number: String,

    pub buyer_id: Uuid,
    pub supplier_id: Uuid,
    pub status: String,
    pub priority: String,
    pub ordered_at: DateTime<Utc>,
    pub required_by: Option<DateTime<Utc>>,
    pub currency: String,
    pub payment_terms: Option<String>,
    /// Independent axis from fulfillment status.
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_line_item::Entity")]
    LineItems,
    #[sea_orm(has_many = "super::shipment::Entity")]
    Shipments,
}

impl Related<super::order_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
