//! `SeaORM` active enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use mazerp_core::movement::ExpenseType as DomainExpenseType;

/// Expense category, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ExpenseType {
    /// Freight and delivery.
    #[sea_orm(string_value = "transport")]
    Transport,
    /// Wages.
    #[sea_orm(string_value = "salary")]
    Salary,
    /// Premises rent.
    #[sea_orm(string_value = "rent")]
    Rent,
    /// Power, water, internet.
    #[sea_orm(string_value = "utilities")]
    Utilities,
    /// Repairs and upkeep.
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// Taxes and fees.
    #[sea_orm(string_value = "tax")]
    Tax,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<DomainExpenseType> for ExpenseType {
    fn from(value: DomainExpenseType) -> Self {
        match value {
            DomainExpenseType::Transport => Self::Transport,
            DomainExpenseType::Salary => Self::Salary,
            DomainExpenseType::Rent => Self::Rent,
            DomainExpenseType::Utilities => Self::Utilities,
            DomainExpenseType::Maintenance => Self::Maintenance,
            DomainExpenseType::Tax => Self::Tax,
            DomainExpenseType::Other => Self::Other,
        }
    }
}

impl From<ExpenseType> for DomainExpenseType {
    fn from(value: ExpenseType) -> Self {
        match value {
            ExpenseType::Transport => Self::Transport,
            ExpenseType::Salary => Self::Salary,
            ExpenseType::Rent => Self::Rent,
            ExpenseType::Utilities => Self::Utilities,
            ExpenseType::Maintenance => Self::Maintenance,
            ExpenseType::Tax => Self::Tax,
            ExpenseType::Other => Self::Other,
        }
    }
}
