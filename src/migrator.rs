use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_orders_table::Migration),
            Box::new(m20240101_000002_create_line_items_tables::Migration),
            Box::new(m20240101_000003_create_shipments_tables::Migration),
            Box::new(m20240101_000004_create_temperature_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create orders table aligned with entities::order Model
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::OrderNumber).string().not_null())
                        .col(ColumnDef::new(Orders::BuyerId).uuid().not_null())
                        .col(ColumnDef::new(Orders::SupplierId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::Priority).string().not_null())
                        .col(ColumnDef::new(Orders::OrderedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::RequiredBy).timestamp().null())
                        .col(ColumnDef::new(Orders::Currency).string().not_null())
                        .col(ColumnDef::new(Orders::PaymentTerms).string().null())
                        .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                        .col(
                            ColumnDef::new(Orders::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::Tax).decimal().not_null().default(0))
                        .col(
                            ColumnDef::new(Orders::ShippingCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::AllowPartialFulfillment)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Orders::MinimumFulfillmentPercentage)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Orders::FulfillmentPercentage)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::Notes).string().null())
                        .col(ColumnDef::new(Orders::CancelReason).string().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .col(
                            ColumnDef::new(Orders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_order_number")
                        .table(Orders::Table)
                        .col(Orders::OrderNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_buyer_id")
                        .table(Orders::Table)
                        .col(Orders::BuyerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_supplier_id")
                        .table(Orders::Table)
                        .col(Orders::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        OrderNumber,
        BuyerId,
        SupplierId,
        Status,
        Priority,
        OrderedAt,
        RequiredBy,
        Currency,
        PaymentTerms,
        PaymentStatus,
        Subtotal,
        Tax,
        ShippingCost,
        Discount,
        Total,
        AllowPartialFulfillment,
        MinimumFulfillmentPercentage,
        FulfillmentPercentage,
        Notes,
        CancelReason,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}

mod m20240101_000002_create_line_items_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_line_items_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create order_line_items table aligned with entities::order_line_item Model
            manager
                .create_table(
                    Table::create()
                        .table(OrderLineItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderLineItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderLineItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderLineItems::ProductId).uuid().not_null())
                        .col(
                            ColumnDef::new(OrderLineItems::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderLineItems::Sku).string().not_null())
                        .col(
                            ColumnDef::new(OrderLineItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderLineItems::Unit).string().not_null())
                        .col(
                            ColumnDef::new(OrderLineItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::TotalPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(OrderLineItems::Status).string().not_null())
                        .col(
                            ColumnDef::new(OrderLineItems::TemperatureZone)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::TemperatureMinCelsius)
                                .double()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::TemperatureMaxCelsius)
                                .double()
                                .null(),
                        )
                        .col(ColumnDef::new(OrderLineItems::BatchNumber).string().null())
                        .col(
                            ColumnDef::new(OrderLineItems::ExpiryDate)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::AllocatedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::ShippedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::DeliveredQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::ReturnedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderLineItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderLineItems::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_line_items_order_id")
                        .table(OrderLineItems::Table)
                        .col(OrderLineItems::OrderId)
                        .to_owned(),
                )
                .await?;

            // Create line_item_events table for the per-item status timeline
            manager
                .create_table(
                    Table::create()
                        .table(LineItemEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LineItemEvents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LineItemEvents::LineItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LineItemEvents::Status).string().not_null())
                        .col(ColumnDef::new(LineItemEvents::Actor).string().not_null())
                        .col(ColumnDef::new(LineItemEvents::Notes).string().null())
                        .col(
                            ColumnDef::new(LineItemEvents::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_line_item_events_line_item_id")
                        .table(LineItemEvents::Table)
                        .col(LineItemEvents::LineItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LineItemEvents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderLineItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderLineItems {
        Table,
        Id,
        OrderId,
        ProductId,
        ProductName,
        Sku,
        Quantity,
        Unit,
        UnitPrice,
        TotalPrice,
        Status,
        TemperatureZone,
        TemperatureMinCelsius,
        TemperatureMaxCelsius,
        BatchNumber,
        ExpiryDate,
        AllocatedQuantity,
        ShippedQuantity,
        DeliveredQuantity,
        ReturnedQuantity,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum LineItemEvents {
        Table,
        Id,
        LineItemId,
        Status,
        Actor,
        Notes,
        OccurredAt,
    }
}

mod m20240101_000003_create_shipments_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_shipments_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create shipments table aligned with entities::shipment Model
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(Shipments::ShipmentNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::CarrierName).string().not_null())
                        .col(ColumnDef::new(Shipments::TrackingNumber).string().null())
                        .col(ColumnDef::new(Shipments::Status).string().not_null())
                        .col(
                            ColumnDef::new(Shipments::PickupAddress)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Shipments::DeliveryAddress)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::EstimatedPickup).timestamp().null())
                        .col(
                            ColumnDef::new(Shipments::EstimatedDelivery)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(Shipments::ActualPickup).timestamp().null())
                        .col(ColumnDef::new(Shipments::ActualDelivery).timestamp().null())
                        .col(ColumnDef::new(Shipments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Shipments::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_order_id")
                        .table(Shipments::Table)
                        .col(Shipments::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_tracking_number")
                        .table(Shipments::Table)
                        .col(Shipments::TrackingNumber)
                        .to_owned(),
                )
                .await?;

            // Create shipment_items table: (line item, quantity) pairs
            manager
                .create_table(
                    Table::create()
                        .table(ShipmentItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentItems::ShipmentId).uuid().not_null())
                        .col(ColumnDef::new(ShipmentItems::LineItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(ShipmentItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_items_shipment_id")
                        .table(ShipmentItems::Table)
                        .col(ShipmentItems::ShipmentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_items_line_item_id")
                        .table(ShipmentItems::Table)
                        .col(ShipmentItems::LineItemId)
                        .to_owned(),
                )
                .await?;

            // Create shipment_events table for the carrier tracking timeline
            manager
                .create_table(
                    Table::create()
                        .table(ShipmentEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentEvents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentEvents::ShipmentId).uuid().not_null())
                        .col(ColumnDef::new(ShipmentEvents::Status).string().not_null())
                        .col(
                            ColumnDef::new(ShipmentEvents::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentEvents::Location).string().null())
                        .col(
                            ColumnDef::new(ShipmentEvents::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentEvents::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_events_shipment_id")
                        .table(ShipmentEvents::Table)
                        .col(ShipmentEvents::ShipmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShipmentEvents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ShipmentItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Shipments {
        Table,
        Id,
        OrderId,
        ShipmentNumber,
        CarrierName,
        TrackingNumber,
        Status,
        PickupAddress,
        DeliveryAddress,
        EstimatedPickup,
        EstimatedDelivery,
        ActualPickup,
        ActualDelivery,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum ShipmentItems {
        Table,
        Id,
        ShipmentId,
        LineItemId,
        Quantity,
    }

    #[derive(DeriveIden)]
    pub(super) enum ShipmentEvents {
        Table,
        Id,
        ShipmentId,
        Status,
        Description,
        Location,
        OccurredAt,
        RecordedAt,
    }
}

mod m20240101_000004_create_temperature_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_temperature_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create temperature_readings table: immutable reported facts
            manager
                .create_table(
                    Table::create()
                        .table(TemperatureReadings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TemperatureReadings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureReadings::ShipmentId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureReadings::Value)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureReadings::Unit)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureReadings::Zone)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TemperatureReadings::DeviceId).string().null())
                        .col(ColumnDef::new(TemperatureReadings::Location).string().null())
                        .col(
                            ColumnDef::new(TemperatureReadings::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_temperature_readings_shipment_id")
                        .table(TemperatureReadings::Table)
                        .col(TemperatureReadings::ShipmentId)
                        .to_owned(),
                )
                .await?;

            // Create temperature_alerts table: append-only violation records
            manager
                .create_table(
                    Table::create()
                        .table(TemperatureAlerts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TemperatureAlerts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureAlerts::ShipmentId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureAlerts::ReadingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureAlerts::Severity)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureAlerts::Message)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureAlerts::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_temperature_alerts_shipment_id")
                        .table(TemperatureAlerts::Table)
                        .col(TemperatureAlerts::ShipmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TemperatureAlerts::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(TemperatureReadings::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum TemperatureReadings {
        Table,
        Id,
        ShipmentId,
        Value,
        Unit,
        Zone,
        DeviceId,
        Location,
        RecordedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum TemperatureAlerts {
        Table,
        Id,
        ShipmentId,
        ReadingId,
        Severity,
        Message,
        OccurredAt,
    }
}
