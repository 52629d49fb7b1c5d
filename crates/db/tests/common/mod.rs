//! Shared fixtures: a migrated in-memory SQLite database with reference rows.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mazerp_core::catalog::{Inventory, InventoryInput, ProductInput, WarehouseInput};
use mazerp_db::migration::{Migrator, MigratorTrait};
use mazerp_db::{AccountRepository, InventoryRepository, ProductRepository, WarehouseRepository};
use mazerp_shared::DatabaseConfig;
use mazerp_shared::types::{ClientId, WarehouseId};
use sea_orm::DatabaseConnection;

/// Connects to a fresh in-memory database and runs all migrations.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = mazerp_db::connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Reference rows every movement test needs.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub client_id: ClientId,
    pub inventory: Inventory,
    pub other_inventory: Inventory,
}

/// Creates a client with a warehouse holding two products.
pub async fn setup_fixture() -> Fixture {
    let db = setup_db().await;

    let client = AccountRepository::clients(db.clone())
        .create("acme", "$argon2id$test_hash")
        .await
        .expect("Failed to create client");
    let client_id = ClientId::new(client.id);

    WarehouseRepository::new(db.clone())
        .create(
            client_id,
            WarehouseInput {
                name: "Central".to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create warehouse");

    let products = ProductRepository::new(db.clone());
    let yerba = products
        .create(ProductInput {
            name: "Yerba".to_string(),
            sell_price: None,
        })
        .await
        .expect("Failed to create product");
    let mate = products
        .create(ProductInput {
            name: "Mate".to_string(),
            sell_price: None,
        })
        .await
        .expect("Failed to create product");

    let inventories = InventoryRepository::new(db.clone());
    let inventory = inventories
        .create(InventoryInput {
            warehouse_id: WarehouseId::from(client_id),
            product_id: yerba.id,
            stock: 10,
            alert_stock: Some(2),
            warning_stock: Some(5),
        })
        .await
        .expect("Failed to create inventory");
    let other_inventory = inventories
        .create(InventoryInput {
            warehouse_id: WarehouseId::from(client_id),
            product_id: mate.id,
            stock: 3,
            alert_stock: None,
            warning_stock: None,
        })
        .await
        .expect("Failed to create inventory");

    Fixture {
        db,
        client_id,
        inventory,
        other_inventory,
    }
}

/// Whole-second UTC timestamp on the given day of January 2025.
pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
}
