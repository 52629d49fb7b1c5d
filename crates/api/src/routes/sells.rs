//! Sell routes.

use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::records::{self, ChildResource, MovementFields};
use crate::{AppState, error::ApiError};
use mazerp_core::movement::{ChildKind, MovementChild, MovementDraft, SellDetails};

/// Creates the sell routes.
pub fn routes() -> Router<AppState> {
    records::routes::<SellRequest>()
}

/// Request body for creating or updating a sell.
#[derive(Debug, Deserialize)]
pub struct SellRequest {
    /// Movement fields.
    #[serde(flatten)]
    pub movement: MovementFields,
    /// Price per unit before discount.
    pub sale_price: Decimal,
    /// Discount in percent; zero when omitted.
    #[serde(default)]
    pub discount_percentage: Decimal,
}

impl ChildResource for SellRequest {
    const KIND: ChildKind = ChildKind::Sell;
    const PATH: &'static str = "sells";

    fn into_parts(self) -> Result<(MovementDraft, MovementChild), ApiError> {
        let child = MovementChild::Sell(SellDetails {
            sale_price: self.sale_price,
            discount_percentage: self.discount_percentage,
        });
        Ok((self.movement.into_draft(), child))
    }
}
