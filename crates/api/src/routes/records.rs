//! Routes shared by buys, sells and expenses.
//!
//! Each child resource only describes how its request body splits into movement fields and
//! child details; listing, lookup and the composite create/update/delete are the same for all
//! three.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, extract::JsonBody, middleware::AuthUser};
use mazerp_core::movement::{
    ChildKind, FullMovementRecord, InventorySnapshot, MovementChild, MovementDraft, MovementFilter,
    MovementRecord, MovementService,
};
use mazerp_db::MovementRepository;
use mazerp_shared::types::{InventoryId, MovementId, ProductId, WarehouseId};

/// Builds a movement service over the shared connection.
pub fn movement_service(state: &AppState) -> MovementService<MovementRepository> {
    MovementService::new(Arc::new(MovementRepository::new((*state.db).clone())))
}

/// A child resource exposed under `/{PATH}`.
pub trait ChildResource: DeserializeOwned + Send + 'static {
    /// Child table the resource maps to.
    const KIND: ChildKind;
    /// Path segment, also used in `Location` headers.
    const PATH: &'static str;

    /// Splits a request body into movement fields and child details.
    fn into_parts(self) -> Result<(MovementDraft, MovementChild), ApiError>;
}

/// Movement fields accepted in every child request body.
#[derive(Debug, Deserialize)]
pub struct MovementFields {
    /// Inventory line the movement applies to.
    pub inventory_id: InventoryId,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Quantity moved, never zero.
    pub quantity: i32,
    /// Defaults to the time of the request.
    #[serde(default)]
    pub movement_date: Option<DateTime<Utc>>,
}

impl MovementFields {
    /// Converts the fields into a draft, stamping a missing date with now.
    #[must_use]
    pub fn into_draft(self) -> MovementDraft {
        MovementDraft {
            inventory_id: self.inventory_id,
            description: self.description,
            quantity: self.quantity,
            movement_date: self.movement_date.unwrap_or_else(Utc::now),
        }
    }
}

/// Query for `/date-range`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive lower bound.
    pub start_date: DateTime<Utc>,
    /// Inclusive upper bound.
    pub end_date: DateTime<Utc>,
}

/// A child record with its movement fields.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    /// Shared movement key.
    pub movement_id: MovementId,
    /// Inventory line.
    pub inventory_id: InventoryId,
    /// Optional description.
    pub description: Option<String>,
    /// Quantity moved.
    pub quantity: i32,
    /// When it happened.
    pub movement_date: DateTime<Utc>,
    /// `kind` plus the child's own fields.
    #[serde(flatten)]
    pub details: MovementChild,
}

impl From<MovementRecord> for RecordResponse {
    fn from(record: MovementRecord) -> Self {
        Self {
            movement_id: record.movement.id,
            inventory_id: record.movement.inventory_id,
            description: record.movement.description,
            quantity: record.movement.quantity,
            movement_date: record.movement.movement_date,
            details: record.child,
        }
    }
}

/// Inventory line with product and warehouse names.
#[derive(Debug, Serialize)]
pub struct InventorySnapshotResponse {
    /// Inventory line.
    pub inventory_id: InventoryId,
    /// Units on hand.
    pub stock: i32,
    /// Product stocked.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Warehouse holding the stock.
    pub warehouse_id: WarehouseId,
    /// Warehouse name.
    pub warehouse_name: String,
}

impl From<InventorySnapshot> for InventorySnapshotResponse {
    fn from(s: InventorySnapshot) -> Self {
        Self {
            inventory_id: s.inventory_id,
            stock: s.stock,
            product_id: s.product_id,
            product_name: s.product_name,
            warehouse_id: s.warehouse_id,
            warehouse_name: s.warehouse_name,
        }
    }
}

/// A child record with its inventory, product and warehouse.
#[derive(Debug, Serialize)]
pub struct FullRecordResponse {
    /// The record itself.
    #[serde(flatten)]
    pub record: RecordResponse,
    /// Reference entities.
    pub inventory: InventorySnapshotResponse,
}

impl From<FullMovementRecord> for FullRecordResponse {
    fn from(full: FullMovementRecord) -> Self {
        Self {
            record: full.record.into(),
            inventory: full.inventory.into(),
        }
    }
}

fn to_responses(records: Vec<MovementRecord>) -> Json<Vec<RecordResponse>> {
    Json(records.into_iter().map(RecordResponse::from).collect())
}

/// Routes for one child resource.
pub fn routes<T: ChildResource>() -> Router<AppState> {
    let base = format!("/{}", T::PATH);
    Router::new()
        .route(&base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<T>).put(update::<T>).delete(remove::<T>),
        )
        .route(&format!("{base}/{{id}}/full"), get(get_full::<T>))
        .route(
            &format!("{base}/product/{{product_id}}"),
            get(list_by_product::<T>),
        )
        .route(&format!("{base}/date-range"), get(list_by_date_range::<T>))
}

/// GET /{PATH}
async fn list<T: ChildResource>(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordResponse>>, ApiError> {
    let records = movement_service(&state)
        .list(T::KIND, MovementFilter::default())
        .await?;
    Ok(to_responses(records))
}

/// GET /{PATH}/{id}
async fn get_one<T: ChildResource>(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = movement_service(&state).get(id, T::KIND).await?;
    Ok(Json(record.into()))
}

/// GET /{PATH}/{id}/full
async fn get_full<T: ChildResource>(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> Result<Json<FullRecordResponse>, ApiError> {
    let full = movement_service(&state).get_full(id, T::KIND).await?;
    Ok(Json(full.into()))
}

/// GET /{PATH}/product/{product_id}
async fn list_by_product<T: ChildResource>(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<RecordResponse>>, ApiError> {
    let records = movement_service(&state)
        .list_by_product(T::KIND, product_id)
        .await?;
    Ok(to_responses(records))
}

/// GET /{PATH}/date-range?startDate=&endDate=
async fn list_by_date_range<T: ChildResource>(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<RecordResponse>>, ApiError> {
    let records = movement_service(&state)
        .list_by_date_range(T::KIND, range.start_date, range.end_date)
        .await?;
    Ok(to_responses(records))
}

/// POST /{PATH}
async fn create<T: ChildResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<T>,
) -> Result<Response, ApiError> {
    let (draft, child) = payload.into_parts()?;
    let record = movement_service(&state).create(draft, child).await?;

    info!(
        movement_id = %record.movement_id(),
        kind = %T::KIND,
        account = auth.name(),
        "Movement record created"
    );

    let location = format!("/api/{}/{}", T::PATH, record.movement_id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RecordResponse::from(record)),
    )
        .into_response())
}

/// PUT /{PATH}/{id}
async fn update<T: ChildResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MovementId>,
    JsonBody(payload): JsonBody<T>,
) -> Result<StatusCode, ApiError> {
    let (draft, child) = payload.into_parts()?;
    movement_service(&state).update(id, draft, child).await?;

    info!(movement_id = %id, kind = %T::KIND, account = auth.name(), "Movement record updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{PATH}/{id}
async fn remove<T: ChildResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MovementId>,
) -> Result<StatusCode, ApiError> {
    movement_service(&state).delete(id, T::KIND).await?;

    info!(movement_id = %id, kind = %T::KIND, account = auth.name(), "Movement record deleted");
    Ok(StatusCode::NO_CONTENT)
}
