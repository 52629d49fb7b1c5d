//! Expense routes, plus a lookup by expense type.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::records::{self, ChildResource, MovementFields, RecordResponse, movement_service};
use crate::{AppState, error::ApiError};
use mazerp_core::movement::{ChildKind, ExpenseDetails, ExpenseType, MovementChild, MovementDraft};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    records::routes::<ExpenseRequest>()
        .route("/expenses/type/{expense_type}", get(list_by_type))
}

/// Request body for creating or updating an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    /// Movement fields.
    #[serde(flatten)]
    pub movement: MovementFields,
    /// Expense category name, e.g. `transport`.
    pub expense_type: String,
    /// Total amount spent.
    pub total_price: Decimal,
}

impl ChildResource for ExpenseRequest {
    const KIND: ChildKind = ChildKind::Expense;
    const PATH: &'static str = "expenses";

    fn into_parts(self) -> Result<(MovementDraft, MovementChild), ApiError> {
        let expense_type: ExpenseType = self.expense_type.parse()?;
        let child = MovementChild::Expense(ExpenseDetails {
            expense_type,
            total_price: self.total_price,
        });
        Ok((self.movement.into_draft(), child))
    }
}

/// GET /expenses/type/{expense_type}
async fn list_by_type(
    State(state): State<AppState>,
    Path(expense_type): Path<String>,
) -> Result<Json<Vec<RecordResponse>>, ApiError> {
    let expense_type: ExpenseType = expense_type.parse()?;
    let records = movement_service(&state)
        .list_expenses_by_type(expense_type)
        .await?;
    Ok(Json(records.into_iter().map(RecordResponse::from).collect()))
}
