//! Reference entities: products, warehouses, inventories.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mazerp_shared::types::{ClientId, InventoryId, ProductId, WarehouseId};

/// A product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// List price, if set.
    pub sell_price: Option<Decimal>,
}

/// Fields for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Display name, at most 40 characters.
    pub name: String,
    /// List price, non-negative.
    pub sell_price: Option<Decimal>,
}

/// A client's warehouse. Each client owns at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// Owning client; also the warehouse key.
    pub client_id: ClientId,
    /// Display name.
    pub name: String,
    /// Free text.
    pub description: Option<String>,
}

impl Warehouse {
    /// The warehouse key.
    #[must_use]
    pub fn id(&self) -> WarehouseId {
        self.client_id.into()
    }
}

/// Fields for creating or replacing a warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseInput {
    /// Display name, at most 30 characters.
    pub name: String,
    /// Free text, at most 255 characters.
    pub description: Option<String>,
}

/// Stock of one product in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Identifier.
    pub id: InventoryId,
    /// Warehouse holding the stock.
    pub warehouse_id: WarehouseId,
    /// Product stocked.
    pub product_id: ProductId,
    /// Units on hand, never negative.
    pub stock: i32,
    /// Critical threshold.
    pub alert_stock: Option<i32>,
    /// Early-warning threshold.
    pub warning_stock: Option<i32>,
}

impl Inventory {
    /// True when stock is below the alert threshold.
    #[must_use]
    pub fn below_alert_stock(&self) -> bool {
        self.alert_stock.is_some_and(|alert| self.stock < alert)
    }

    /// True when stock is below the warning threshold.
    #[must_use]
    pub fn below_warning_stock(&self) -> bool {
        self.warning_stock.is_some_and(|warning| self.stock < warning)
    }
}

/// Fields for creating or replacing an inventory line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryInput {
    /// Warehouse holding the stock.
    pub warehouse_id: WarehouseId,
    /// Product stocked.
    pub product_id: ProductId,
    /// Units on hand.
    pub stock: i32,
    /// Critical threshold.
    pub alert_stock: Option<i32>,
    /// Early-warning threshold.
    pub warning_stock: Option<i32>,
}
