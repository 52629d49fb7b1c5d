//! Product routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, extract::JsonBody, middleware::AuthUser};
use mazerp_core::catalog::{CatalogError, Product, ProductInput};
use mazerp_db::ProductRepository;
use mazerp_shared::types::ProductId;

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Display name.
    pub name: String,
    /// Optional list price.
    #[serde(default)]
    pub sell_price: Option<Decimal>,
}

impl From<ProductRequest> for ProductInput {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            sell_price: req.sell_price,
        }
    }
}

fn repository(state: &AppState) -> ProductRepository {
    ProductRepository::new((*state.db).clone())
}

/// GET /products
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    repository(&state)
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::not_found("product", id.into_inner()).into())
}

/// POST /products
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<Response, ApiError> {
    let product = repository(&state).create(payload.into()).await?;

    info!(product_id = %product.id, account = auth.name(), "Product created");

    let location = format!("/api/products/{}", product.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)).into_response())
}

/// PUT /products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<StatusCode, ApiError> {
    repository(&state).update(id, payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /products/{id}
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    repository(&state).delete(id).await?;

    info!(product_id = %id, account = auth.name(), "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
