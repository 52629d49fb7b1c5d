//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod buys;
pub mod expenses;
pub mod health;
pub mod inventories;
pub mod movements;
pub mod products;
pub mod records;
pub mod sells;
pub mod warehouses;

/// Creates the API router: public health and auth routes, everything else behind a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(products::routes())
        .merge(warehouses::routes())
        .merge(inventories::routes())
        .merge(movements::routes())
        .merge(buys::routes())
        .merge(sells::routes())
        .merge(expenses::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
