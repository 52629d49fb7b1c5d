//! Initial schema: accounts, catalog, movements and their children.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // ACCOUNTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Clients::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // CATALOG
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warehouses::ClientId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warehouses::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Warehouses::Description).string_len(255).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warehouses_client_id")
                            .from(Warehouses::Table, Warehouses::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string_len(40).not_null())
                    .col(ColumnDef::new(Products::SellPrice).decimal_len(16, 4).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inventories::WarehouseId).integer().not_null())
                    .col(ColumnDef::new(Inventories::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(Inventories::Stock)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Inventories::Stock).gte(0)),
                    )
                    .col(ColumnDef::new(Inventories::AlertStock).integer().null())
                    .col(ColumnDef::new(Inventories::WarningStock).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_warehouse_id")
                            .from(Inventories::Table, Inventories::WarehouseId)
                            .to(Warehouses::Table, Warehouses::ClientId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_product_id")
                            .from(Inventories::Table, Inventories::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_inventories_warehouse_product")
                    .table(Inventories::Table)
                    .col(Inventories::WarehouseId)
                    .col(Inventories::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // MOVEMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Movements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movements::InventoryId).integer().not_null())
                    .col(ColumnDef::new(Movements::Description).string_len(225).null())
                    .col(
                        ColumnDef::new(Movements::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Movements::Quantity).ne(0)),
                    )
                    .col(
                        ColumnDef::new(Movements::MovementDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movements_inventory_id")
                            .from(Movements::Table, Movements::InventoryId)
                            .to(Inventories::Table, Inventories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movements_date")
                    .table(Movements::Table)
                    .col(Movements::MovementDate)
                    .to_owned(),
            )
            .await?;

        // Children share the movement's key; ON DELETE RESTRICT keeps a movement from
        // being removed while a child still references it.
        manager
            .create_table(
                Table::create()
                    .table(Buys::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Buys::MovementId).integer().not_null().primary_key())
                    .col(
                        ColumnDef::new(Buys::UnitPrice)
                            .decimal_len(16, 4)
                            .not_null()
                            .check(Expr::col(Buys::UnitPrice).gt(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_buys_movement_id")
                            .from(Buys::Table, Buys::MovementId)
                            .to(Movements::Table, Movements::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sells::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sells::MovementId).integer().not_null().primary_key())
                    .col(
                        ColumnDef::new(Sells::SalePrice)
                            .decimal_len(16, 4)
                            .not_null()
                            .check(Expr::col(Sells::SalePrice).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Sells::DiscountPercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Sells::DiscountPercentage).between(0, 100)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sells_movement_id")
                            .from(Sells::Table, Sells::MovementId)
                            .to(Movements::Table, Movements::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::MovementId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::ExpenseType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Expenses::TotalPrice)
                            .decimal_len(16, 4)
                            .not_null()
                            .check(Expr::col(Expenses::TotalPrice).gt(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_movement_id")
                            .from(Expenses::Table, Expenses::MovementId)
                            .to(Movements::Table, Movements::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sells::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buys::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inventories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Warehouses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Warehouses {
    Table,
    ClientId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    SellPrice,
}

#[derive(DeriveIden)]
enum Inventories {
    Table,
    Id,
    WarehouseId,
    ProductId,
    Stock,
    AlertStock,
    WarningStock,
}

#[derive(DeriveIden)]
enum Movements {
    Table,
    Id,
    InventoryId,
    Description,
    Quantity,
    MovementDate,
}

#[derive(DeriveIden)]
enum Buys {
    Table,
    MovementId,
    UnitPrice,
}

#[derive(DeriveIden)]
enum Sells {
    Table,
    MovementId,
    SalePrice,
    DiscountPercentage,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    MovementId,
    ExpenseType,
    TotalPrice,
}
