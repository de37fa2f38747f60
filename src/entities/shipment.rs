use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical consignment carrying quantities of one or more line items.
/// Carrier facts are recorded as reported; this engine performs no carrier
/// integration of its own.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    #[sea_orm(has_many = "super::shipment_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::shipment_event::Entity")]
    TrackingEvents,
    #[sea_orm(has_many = "super::temperature_reading::Entity")]
    TemperatureReadings,
    #[sea_orm(has_many = "super::temperature_alert::Entity")]
    TemperatureAlerts,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::shipment_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::shipment_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingEvents.def()
    }
}

impl Related<super::temperature_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemperatureReadings.def()
    }
}

impl Related<super::temperature_alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemperatureAlerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
