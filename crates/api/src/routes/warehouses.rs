//! Warehouse routes. A warehouse is addressed by its owning client's id.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, extract::JsonBody, middleware::AuthUser};
use mazerp_core::catalog::{CatalogError, Warehouse, WarehouseInput};
use mazerp_db::WarehouseRepository;
use mazerp_shared::types::ClientId;

/// Creates the warehouse routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route(
            "/warehouses/{client_id}",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
}

/// Request body for creating a warehouse.
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    /// Owning client.
    pub client_id: ClientId,
    /// Warehouse fields.
    #[serde(flatten)]
    pub warehouse: WarehouseRequest,
}

/// Request body for replacing a warehouse.
#[derive(Debug, Deserialize)]
pub struct WarehouseRequest {
    /// Display name.
    pub name: String,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<WarehouseRequest> for WarehouseInput {
    fn from(req: WarehouseRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

fn repository(state: &AppState) -> WarehouseRepository {
    WarehouseRepository::new((*state.db).clone())
}

/// GET /warehouses
async fn list_warehouses(State(state): State<AppState>) -> Result<Json<Vec<Warehouse>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

/// GET /warehouses/{client_id}
async fn get_warehouse(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
) -> Result<Json<Warehouse>, ApiError> {
    repository(&state)
        .find_by_client(client_id)
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::not_found("warehouse", client_id.into_inner()).into())
}

/// POST /warehouses
async fn create_warehouse(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<CreateWarehouseRequest>,
) -> Result<Response, ApiError> {
    let warehouse = repository(&state)
        .create(payload.client_id, payload.warehouse.into())
        .await?;

    info!(client_id = %warehouse.client_id, account = auth.name(), "Warehouse created");

    let location = format!("/api/warehouses/{}", warehouse.client_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(warehouse)).into_response())
}

/// PUT /warehouses/{client_id}
async fn update_warehouse(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
    JsonBody(payload): JsonBody<WarehouseRequest>,
) -> Result<StatusCode, ApiError> {
    repository(&state).update(client_id, payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /warehouses/{client_id}
async fn delete_warehouse(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<ClientId>,
) -> Result<StatusCode, ApiError> {
    repository(&state).delete(client_id).await?;

    info!(client_id = %client_id, account = auth.name(), "Warehouse deleted");
    Ok(StatusCode::NO_CONTENT)
}
