//! Movement domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mazerp_shared::types::{InventoryId, MovementId, ProductId, WarehouseId};

use super::error::MovementError;

/// A stock-affecting event. Always owned by exactly one buy, sell or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Store-assigned identifier, shared with the owning child.
    pub id: MovementId,
    /// Inventory line (warehouse + product) the movement applies to.
    pub inventory_id: InventoryId,
    /// Free text, at most 225 characters.
    pub description: Option<String>,
    /// Never zero.
    pub quantity: i32,
    /// When the movement happened.
    pub movement_date: DateTime<Utc>,
}

/// The mutable fields of a movement, as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementDraft {
    /// Inventory line the movement applies to.
    pub inventory_id: InventoryId,
    /// Optional description.
    pub description: Option<String>,
    /// Quantity moved.
    pub quantity: i32,
    /// Movement timestamp.
    pub movement_date: DateTime<Utc>,
}

impl MovementDraft {
    /// Builds the movement this draft describes under the given id.
    #[must_use]
    pub fn into_movement(self, id: MovementId) -> Movement {
        Movement {
            id,
            inventory_id: self.inventory_id,
            description: self.description,
            quantity: self.quantity,
            movement_date: self.movement_date,
        }
    }
}

/// Category of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    /// Freight and delivery.
    Transport,
    /// Wages.
    Salary,
    /// Premises rent.
    Rent,
    /// Power, water, internet.
    Utilities,
    /// Repairs and upkeep.
    Maintenance,
    /// Taxes and fees.
    Tax,
    /// Anything else.
    Other,
}

impl ExpenseType {
    /// Every expense type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Transport,
        Self::Salary,
        Self::Rent,
        Self::Utilities,
        Self::Maintenance,
        Self::Tax,
        Self::Other,
    ];

    /// Returns the stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Salary => "salary",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Maintenance => "maintenance",
            Self::Tax => "tax",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = MovementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MovementError::UnknownExpenseType(s.to_string()))
    }
}

/// Purchase details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyDetails {
    /// Price paid per unit.
    pub unit_price: Decimal,
}

/// Sale details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellDetails {
    /// Price charged per unit.
    pub sale_price: Decimal,
    /// Discount in percent, 0 to 100.
    pub discount_percentage: Decimal,
}

/// Expense details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetails {
    /// Category.
    pub expense_type: ExpenseType,
    /// Total amount.
    pub total_price: Decimal,
}

/// The specialization that owns a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementChild {
    /// A purchase.
    Buy(BuyDetails),
    /// A sale.
    Sell(SellDetails),
    /// An expense.
    Expense(ExpenseDetails),
}

impl MovementChild {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> ChildKind {
        match self {
            Self::Buy(_) => ChildKind::Buy,
            Self::Sell(_) => ChildKind::Sell,
            Self::Expense(_) => ChildKind::Expense,
        }
    }
}

/// Discriminant of [`MovementChild`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildKind {
    /// Buy table.
    Buy,
    /// Sell table.
    Sell,
    /// Expense table.
    Expense,
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => f.write_str("buy"),
            Self::Sell => f.write_str("sell"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

/// A child together with its movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRecord {
    /// The owning movement.
    pub movement: Movement,
    /// Child-specific fields.
    pub child: MovementChild,
}

impl MovementRecord {
    /// The child's key, which is its movement's id.
    #[must_use]
    pub const fn movement_id(&self) -> MovementId {
        self.movement.id
    }

    /// Returns the child kind.
    #[must_use]
    pub const fn kind(&self) -> ChildKind {
        self.child.kind()
    }
}

/// A movement as read directly, with whatever child currently owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementView {
    /// The movement.
    pub movement: Movement,
    /// The owning child, if any.
    pub child: Option<MovementChild>,
}

/// Reference entities a movement points at, eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Inventory line.
    pub inventory_id: InventoryId,
    /// Current stock of the line.
    pub stock: i32,
    /// Product of the line.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Warehouse of the line.
    pub warehouse_id: WarehouseId,
    /// Warehouse name.
    pub warehouse_name: String,
}

/// A movement with its child and reference entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullMovementView {
    /// The movement and its child.
    pub view: MovementView,
    /// Inventory, product and warehouse.
    pub inventory: InventorySnapshot,
}

/// A child record with its movement and reference entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullMovementRecord {
    /// The child and its movement.
    pub record: MovementRecord,
    /// Inventory, product and warehouse.
    pub inventory: InventorySnapshot,
}

/// Inclusive date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::InvalidDateRange` when `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, MovementError> {
        if start > end {
            return Err(MovementError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if `at` falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Lookup criteria. Empty means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFilter {
    /// Only movements whose inventory holds this product.
    pub product_id: Option<ProductId>,
    /// Only movements dated within this range.
    pub date_range: Option<DateRange>,
    /// Only expenses of this type.
    pub expense_type: Option<ExpenseType>,
}

impl MovementFilter {
    /// Filter by product.
    #[must_use]
    pub fn by_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    /// Filter by date range.
    #[must_use]
    pub fn by_date_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..Self::default()
        }
    }

    /// Filter by expense type.
    #[must_use]
    pub fn by_expense_type(expense_type: ExpenseType) -> Self {
        Self {
            expense_type: Some(expense_type),
            ..Self::default()
        }
    }
}
