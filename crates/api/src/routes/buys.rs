//! Buy routes.

use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::records::{self, ChildResource, MovementFields};
use crate::{AppState, error::ApiError};
use mazerp_core::movement::{BuyDetails, ChildKind, MovementChild, MovementDraft};

/// Creates the buy routes.
pub fn routes() -> Router<AppState> {
    records::routes::<BuyRequest>()
}

/// Request body for creating or updating a buy.
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    /// Movement fields.
    #[serde(flatten)]
    pub movement: MovementFields,
    /// Price paid per unit.
    pub unit_price: Decimal,
}

impl ChildResource for BuyRequest {
    const KIND: ChildKind = ChildKind::Buy;
    const PATH: &'static str = "buys";

    fn into_parts(self) -> Result<(MovementDraft, MovementChild), ApiError> {
        let child = MovementChild::Buy(BuyDetails {
            unit_price: self.unit_price,
        });
        Ok((self.movement.into_draft(), child))
    }
}
