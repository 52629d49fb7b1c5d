//! Database seeder for MazERP development and testing.
//!
//! Seeds a back-office user, a client with its warehouse, a few products with inventory
//! lines, and one buy, sell and expense. Rows that already exist are left alone, so the
//! seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mazerp_core::auth::Credentials;
use mazerp_core::catalog::{InventoryInput, ProductInput, WarehouseInput};
use mazerp_core::movement::{
    BuyDetails, ExpenseDetails, ExpenseType, MovementChild, MovementDraft, MovementFilter,
    MovementService, SellDetails,
};
use mazerp_db::{
    AccountRepository, InventoryRepository, MovementRepository, ProductRepository,
    WarehouseRepository,
};
use mazerp_shared::DatabaseConfig;
use mazerp_shared::types::{ClientId, InventoryId, WarehouseId};

const DEV_USER: (&str, &str) = ("admin", "admin-dev-pw");
const DEV_CLIENT: (&str, &str) = ("acme", "acme-dev-pw");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mazerp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    info!("Connecting to database");
    let db = mazerp_db::connect(&DatabaseConfig::new(database_url))
        .await
        .context("Failed to connect to database")?;

    seed_account(AccountRepository::users(db.clone()), DEV_USER).await?;
    let client_id =
        ClientId::new(seed_account(AccountRepository::clients(db.clone()), DEV_CLIENT).await?);

    seed_warehouse(&db, client_id).await?;
    let inventories = seed_catalog(&db, client_id.into()).await?;
    seed_movements(&db, &inventories).await?;

    info!("Seeding complete");
    Ok(())
}

/// Registers an account unless the name is taken; returns its id.
async fn seed_account(repo: AccountRepository, (name, password): (&str, &str)) -> anyhow::Result<i32> {
    if let Some(existing) = repo.find_by_name(name).await? {
        info!(name, kind = %repo.kind(), "Account already exists, skipping");
        return Ok(existing.id);
    }

    let credentials = Credentials::validate(name, password)?;
    let account = repo.create(&credentials.name, &credentials.hash()?).await?;
    info!(name, kind = %account.kind, id = account.id, "Seeded account");
    Ok(account.id)
}

async fn seed_warehouse(db: &DatabaseConnection, client_id: ClientId) -> anyhow::Result<()> {
    let repo = WarehouseRepository::new(db.clone());
    if repo.find_by_client(client_id).await?.is_some() {
        info!(%client_id, "Warehouse already exists, skipping");
        return Ok(());
    }

    repo.create(
        client_id,
        WarehouseInput {
            name: "Central".to_string(),
            description: Some("Main depot".to_string()),
        },
    )
    .await?;
    info!(%client_id, "Seeded warehouse");
    Ok(())
}

/// Seeds products and their inventory lines; returns the line ids.
async fn seed_catalog(
    db: &DatabaseConnection,
    warehouse_id: WarehouseId,
) -> anyhow::Result<Vec<InventoryId>> {
    let products = ProductRepository::new(db.clone());
    let inventories = InventoryRepository::new(db.clone());

    let existing = inventories.list(Some(warehouse_id)).await?;
    if !existing.is_empty() {
        info!(lines = existing.len(), "Inventory already seeded, skipping");
        return Ok(existing.into_iter().map(|inv| inv.id).collect());
    }

    let mut ids = Vec::new();
    for (name, price, stock) in [
        ("Yerba mate 1kg", Decimal::new(4_250, 2), 40),
        ("Mate gourd", Decimal::new(12_900, 2), 8),
        ("Bombilla", Decimal::new(3_500, 2), 2),
    ] {
        let product = products
            .create(ProductInput {
                name: name.to_string(),
                sell_price: Some(price),
            })
            .await?;
        let line = inventories
            .create(InventoryInput {
                warehouse_id,
                product_id: product.id,
                stock,
                alert_stock: Some(3),
                warning_stock: Some(10),
            })
            .await?;
        info!(product = name, inventory_id = %line.id, "Seeded product");
        ids.push(line.id);
    }
    Ok(ids)
}

async fn seed_movements(db: &DatabaseConnection, inventories: &[InventoryId]) -> anyhow::Result<()> {
    let service = MovementService::new(Arc::new(MovementRepository::new(db.clone())));
    if !service.list_movements(MovementFilter::default()).await?.is_empty() {
        info!("Movements already seeded, skipping");
        return Ok(());
    }
    let Some(&inventory_id) = inventories.first() else {
        return Ok(());
    };

    let now = Utc::now();
    let seeds = [
        (
            "Opening purchase",
            40,
            now - Duration::days(7),
            MovementChild::Buy(BuyDetails {
                unit_price: Decimal::new(3_000, 2),
            }),
        ),
        (
            "Counter sale",
            -3,
            now - Duration::days(2),
            MovementChild::Sell(SellDetails {
                sale_price: Decimal::new(4_250, 2),
                discount_percentage: Decimal::new(5, 0),
            }),
        ),
        (
            "Delivery van",
            1,
            now - Duration::days(1),
            MovementChild::Expense(ExpenseDetails {
                expense_type: ExpenseType::Transport,
                total_price: Decimal::new(18_000, 2),
            }),
        ),
    ];

    for (description, quantity, movement_date, child) in seeds {
        let record = service
            .create(
                MovementDraft {
                    inventory_id,
                    description: Some(description.to_string()),
                    quantity,
                    movement_date,
                },
                child,
            )
            .await?;
        info!(movement_id = %record.movement_id(), kind = %record.kind(), "Seeded movement");
    }
    Ok(())
}
