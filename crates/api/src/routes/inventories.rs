//! Inventory routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, extract::JsonBody, middleware::AuthUser};
use mazerp_core::catalog::{CatalogError, Inventory, InventoryInput};
use mazerp_db::InventoryRepository;
use mazerp_shared::types::{InventoryId, ProductId, WarehouseId};

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventories", get(list_inventories).post(create_inventory))
        .route(
            "/inventories/{id}",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
}

/// Optional filter for listing.
#[derive(Debug, Deserialize)]
pub struct ListInventoriesQuery {
    /// Only lines in this warehouse.
    pub warehouse_id: Option<WarehouseId>,
}

/// Request body for creating or replacing an inventory line.
#[derive(Debug, Deserialize)]
pub struct InventoryRequest {
    /// Warehouse holding the stock.
    pub warehouse_id: WarehouseId,
    /// Product stocked.
    pub product_id: ProductId,
    /// Units on hand.
    #[serde(default)]
    pub stock: i32,
    /// Critical threshold.
    #[serde(default)]
    pub alert_stock: Option<i32>,
    /// Early-warning threshold.
    #[serde(default)]
    pub warning_stock: Option<i32>,
}

impl From<InventoryRequest> for InventoryInput {
    fn from(req: InventoryRequest) -> Self {
        Self {
            warehouse_id: req.warehouse_id,
            product_id: req.product_id,
            stock: req.stock,
            alert_stock: req.alert_stock,
            warning_stock: req.warning_stock,
        }
    }
}

/// Inventory line with its stock flags.
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    /// Identifier.
    pub id: InventoryId,
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
    /// Stock is under the critical threshold.
    pub below_alert_stock: bool,
    /// Stock is under the early-warning threshold.
    pub below_warning_stock: bool,
}

impl From<Inventory> for InventoryResponse {
    fn from(inv: Inventory) -> Self {
        Self {
            below_alert_stock: inv.below_alert_stock(),
            below_warning_stock: inv.below_warning_stock(),
            id: inv.id,
            warehouse_id: inv.warehouse_id,
            product_id: inv.product_id,
            stock: inv.stock,
            alert_stock: inv.alert_stock,
            warning_stock: inv.warning_stock,
        }
    }
}

fn repository(state: &AppState) -> InventoryRepository {
    InventoryRepository::new((*state.db).clone())
}

/// GET /inventories?warehouse_id=
async fn list_inventories(
    State(state): State<AppState>,
    Query(query): Query<ListInventoriesQuery>,
) -> Result<Json<Vec<InventoryResponse>>, ApiError> {
    let lines = repository(&state).list(query.warehouse_id).await?;
    Ok(Json(lines.into_iter().map(InventoryResponse::from).collect()))
}

/// GET /inventories/{id}
async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<InventoryId>,
) -> Result<Json<InventoryResponse>, ApiError> {
    repository(&state)
        .find_by_id(id)
        .await?
        .map(|inv| Json(inv.into()))
        .ok_or_else(|| CatalogError::not_found("inventory", id.into_inner()).into())
}

/// POST /inventories
async fn create_inventory(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<InventoryRequest>,
) -> Result<Response, ApiError> {
    let inventory = repository(&state).create(payload.into()).await?;

    info!(inventory_id = %inventory.id, account = auth.name(), "Inventory line created");

    let location = format!("/api/inventories/{}", inventory.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(InventoryResponse::from(inventory)),
    )
        .into_response())
}

/// PUT /inventories/{id}
async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<InventoryId>,
    JsonBody(payload): JsonBody<InventoryRequest>,
) -> Result<StatusCode, ApiError> {
    repository(&state).update(id, payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /inventories/{id}
async fn delete_inventory(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InventoryId>,
) -> Result<StatusCode, ApiError> {
    repository(&state).delete(id).await?;

    info!(inventory_id = %id, account = auth.name(), "Inventory line deleted");
    Ok(StatusCode::NO_CONTENT)
}
