//! Movements and the buy/sell/expense records that own them.
//!
//! A movement is created together with exactly one child and deleted together with it.
//! Direct updates and deletes of a movement are refused while a child still references it.

mod error;
mod service;
mod types;
pub mod validation;


pub use error::MovementError;
pub use service::{MovementRepository, MovementService};
pub use types::{
    BuyDetails, ChildKind, DateRange, ExpenseDetails, ExpenseType, FullMovementRecord,
    FullMovementView, InventorySnapshot, Movement, MovementChild, MovementDraft, MovementFilter,
    MovementRecord, MovementView, SellDetails,
};
