//! Movement routes.
//!
//! Movements are created only through their buy, sell or expense. Direct updates and deletes
//! are guarded: a movement some child references answers 409 and is left untouched.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::records::{DateRangeQuery, InventorySnapshotResponse, MovementFields, movement_service};
use crate::{AppState, error::ApiError, extract::JsonBody, middleware::AuthUser};
use mazerp_core::movement::{FullMovementView, MovementChild, MovementError, MovementFilter, MovementView};
use mazerp_shared::types::{InventoryId, MovementId, ProductId};

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route(
            "/movements/{id}",
            get(get_movement).put(update_movement).delete(delete_movement),
        )
        .route("/movements/{id}/full", get(get_full_movement))
        .route("/movements/{id}/related", get(has_related_records))
        .route("/movements/product/{product_id}", get(list_by_product))
        .route("/movements/date-range", get(list_by_date_range))
}

/// A movement and whichever child owns it.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement key.
    pub id: MovementId,
    /// Inventory line.
    pub inventory_id: InventoryId,
    /// Optional description.
    pub description: Option<String>,
    /// Quantity moved.
    pub quantity: i32,
    /// When it happened.
    pub movement_date: DateTime<Utc>,
    /// Owning buy, sell or expense, if any.
    pub child: Option<MovementChild>,
}

impl From<MovementView> for MovementResponse {
    fn from(view: MovementView) -> Self {
        Self {
            id: view.movement.id,
            inventory_id: view.movement.inventory_id,
            description: view.movement.description,
            quantity: view.movement.quantity,
            movement_date: view.movement.movement_date,
            child: view.child,
        }
    }
}

/// A movement with its inventory, product and warehouse.
#[derive(Debug, Serialize)]
pub struct FullMovementResponse {
    /// The movement.
    #[serde(flatten)]
    pub movement: MovementResponse,
    /// Reference entities.
    pub inventory: InventorySnapshotResponse,
}

impl From<FullMovementView> for FullMovementResponse {
    fn from(full: FullMovementView) -> Self {
        Self {
            movement: full.view.into(),
            inventory: full.inventory.into(),
        }
    }
}

/// Integrity guard answer.
#[derive(Debug, Serialize)]
pub struct RelatedRecordsResponse {
    /// Movement asked about.
    pub movement_id: MovementId,
    /// True when a buy, sell or expense references it.
    pub has_related_records: bool,
}

fn to_responses(views: Vec<MovementView>) -> Json<Vec<MovementResponse>> {
    Json(views.into_iter().map(MovementResponse::from).collect())
}

/// GET /movements
async fn list_movements(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovementResponse>>, ApiError> {
    let views = movement_service(&state)
        .list_movements(MovementFilter::default())
        .await?;
    Ok(to_responses(views))
}

/// GET /movements/{id}
async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> Result<Json<MovementResponse>, ApiError> {
    let view = movement_service(&state).get_movement(id).await?;
    Ok(Json(view.into()))
}

/// GET /movements/{id}/full
async fn get_full_movement(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> Result<Json<FullMovementResponse>, ApiError> {
    let full = movement_service(&state).get_full_movement(id).await?;
    Ok(Json(full.into()))
}

/// GET /movements/{id}/related
async fn has_related_records(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> Result<Json<RelatedRecordsResponse>, ApiError> {
    let has_related_records = movement_service(&state).has_related_records(id).await?;
    Ok(Json(RelatedRecordsResponse {
        movement_id: id,
        has_related_records,
    }))
}

/// GET /movements/product/{product_id}
async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<MovementResponse>>, ApiError> {
    let views = movement_service(&state)
        .list_movements(MovementFilter::by_product(product_id))
        .await?;
    Ok(to_responses(views))
}

/// GET /movements/date-range?startDate=&endDate=
async fn list_by_date_range(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<MovementResponse>>, ApiError> {
    let views = movement_service(&state)
        .list_movements_by_date_range(range.start_date, range.end_date)
        .await?;
    Ok(to_responses(views))
}

/// PUT /movements/{id}
async fn update_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MovementId>,
    JsonBody(payload): JsonBody<MovementFields>,
) -> Result<StatusCode, ApiError> {
    match movement_service(&state)
        .update_movement(id, payload.into_draft())
        .await
    {
        Ok(_) => {
            info!(movement_id = %id, account = auth.name(), "Movement updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e @ MovementError::HasRelatedRecords(_)) => {
            warn!(movement_id = %id, account = auth.name(), "Blocked update of a referenced movement");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /movements/{id}
async fn delete_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MovementId>,
) -> Result<StatusCode, ApiError> {
    match movement_service(&state).delete_movement(id).await {
        Ok(()) => {
            info!(movement_id = %id, account = auth.name(), "Movement deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e @ MovementError::HasRelatedRecords(_)) => {
            warn!(movement_id = %id, account = auth.name(), "Blocked delete of a referenced movement");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
