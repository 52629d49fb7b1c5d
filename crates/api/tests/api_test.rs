//! End-to-end tests driving the router against in-memory SQLite.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use mazerp_api::{AppState, create_router};
use mazerp_db::migration::{Migrator, MigratorTrait};
use mazerp_shared::{CorsConfig, DatabaseConfig, JwtConfig, JwtService};

struct TestApp {
    router: Router,
    token: String,
    inventory_id: i64,
    product_id: i64,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn build_router() -> Router {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = mazerp_db::connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        })),
    };
    create_router(state, &CorsConfig::default())
}

/// Registers and logs in a user, then creates a client warehouse, a product and an inventory line.
async fn setup() -> TestApp {
    let router = build_router().await;
    let credentials = json!({ "name": "ana", "password": "secret-pw" });

    let registered = send(
        &router,
        Method::POST,
        "/api/users/register",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let login = send(&router, Method::POST, "/api/users/login", None, Some(credentials)).await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.body["token"].as_str().unwrap().to_string();

    let client = send(
        &router,
        Method::POST,
        "/api/clients/register",
        None,
        Some(json!({ "name": "acme", "password": "client-pw" })),
    )
    .await;
    let client_id = client.body["id"].as_i64().unwrap();

    let warehouse = send(
        &router,
        Method::POST,
        "/api/warehouses",
        Some(&token),
        Some(json!({ "client_id": client_id, "name": "Central" })),
    )
    .await;
    assert_eq!(warehouse.status, StatusCode::CREATED);

    let product = send(
        &router,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({ "name": "Yerba", "sell_price": "12.50" })),
    )
    .await;
    assert_eq!(product.status, StatusCode::CREATED);
    let product_id = product.body["id"].as_i64().unwrap();

    let inventory = send(
        &router,
        Method::POST,
        "/api/inventories",
        Some(&token),
        Some(json!({
            "warehouse_id": client_id,
            "product_id": product_id,
            "stock": 4,
            "alert_stock": 5,
            "warning_stock": 3
        })),
    )
    .await;
    assert_eq!(inventory.status, StatusCode::CREATED);
    assert_eq!(inventory.body["below_alert_stock"], json!(true));
    assert_eq!(inventory.body["below_warning_stock"], json!(false));
    let inventory_id = inventory.body["id"].as_i64().unwrap();

    TestApp {
        router,
        token,
        inventory_id,
        product_id,
    }
}

impl TestApp {
    async fn get(&self, uri: &str) -> TestResponse {
        send(&self.router, Method::GET, uri, Some(&self.token), None).await
    }

    async fn post(&self, uri: &str, body: Value) -> TestResponse {
        send(&self.router, Method::POST, uri, Some(&self.token), Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> TestResponse {
        send(&self.router, Method::PUT, uri, Some(&self.token), Some(body)).await
    }

    async fn delete(&self, uri: &str) -> TestResponse {
        send(&self.router, Method::DELETE, uri, Some(&self.token), None).await
    }

    async fn create_buy(&self, quantity: i32, day: u32, unit_price: &str) -> i64 {
        let response = self
            .post(
                "/api/buys",
                json!({
                    "inventory_id": self.inventory_id,
                    "quantity": quantity,
                    "movement_date": format!("2025-01-{day:02}T12:00:00Z"),
                    "unit_price": unit_price
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["movement_id"].as_i64().unwrap()
    }

    async fn create_expense(&self, expense_type: &str, day: u32) -> i64 {
        let response = self
            .post(
                "/api/expenses",
                json!({
                    "inventory_id": self.inventory_id,
                    "quantity": 1,
                    "movement_date": format!("2025-01-{day:02}T12:00:00Z"),
                    "expense_type": expense_type,
                    "total_price": "300"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["movement_id"].as_i64().unwrap()
    }
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let router = build_router().await;
    let response = send(&router, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let router = build_router().await;

    let missing = send(&router, Method::GET, "/api/buys", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "missing_token");

    let garbage = send(&router, Method::GET, "/api/buys", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "invalid_token");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_and_duplicates() {
    let app = setup().await;

    let wrong = send(
        &app.router,
        Method::POST,
        "/api/users/login",
        None,
        Some(json!({ "name": "ana", "password": "nope" })),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let unknown = send(
        &app.router,
        Method::POST,
        "/api/clients/login",
        None,
        Some(json!({ "name": "ana", "password": "secret-pw" })),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

    let duplicate = send(
        &app.router,
        Method::POST,
        "/api/users/register",
        None,
        Some(json!({ "name": "ana", "password": "another" })),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let client_login = send(
        &app.router,
        Method::POST,
        "/api/clients/login",
        None,
        Some(json!({ "name": "acme", "password": "client-pw" })),
    )
    .await;
    assert_eq!(client_login.status, StatusCode::OK);
    assert_eq!(client_login.body["account"]["kind"], "client");
}

#[tokio::test]
async fn test_create_buy_returns_created_with_location() {
    let app = setup().await;

    let response = app
        .post(
            "/api/buys",
            json!({
                "inventory_id": app.inventory_id,
                "quantity": 3,
                "unit_price": 50
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["movement_id"].as_i64().unwrap();
    assert_eq!(
        response.headers[header::LOCATION].to_str().unwrap(),
        format!("/api/buys/{id}")
    );
    assert_eq!(response.body["kind"], "buy");
    assert_eq!(response.body["quantity"], 3);
    assert_eq!(decimal(&response.body["unit_price"]), Decimal::from(50));

    let fetched = app.get(&format!("/api/buys/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(decimal(&fetched.body["unit_price"]), Decimal::from(50));

    let movement = app.get(&format!("/api/movements/{id}")).await;
    assert_eq!(movement.body["child"]["kind"], "buy");
}

#[tokio::test]
async fn test_invalid_sell_is_rejected_without_rows() {
    let app = setup().await;

    let response = app
        .post(
            "/api/sells",
            json!({
                "inventory_id": app.inventory_id,
                "quantity": -2,
                "sale_price": "30",
                "discount_percentage": "150"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let movements = app.get("/api/movements").await;
    assert_eq!(movements.body, json!([]));
}

#[tokio::test]
async fn test_unknown_inventory_is_bad_request() {
    let app = setup().await;

    let response = app
        .post(
            "/api/buys",
            json!({ "inventory_id": 999, "quantity": 1, "unit_price": "5" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let app = setup().await;

    let missing_price = app
        .post(
            "/api/buys",
            json!({ "inventory_id": app.inventory_id, "quantity": 3 }),
        )
        .await;
    assert_eq!(missing_price.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_price.body["error"], "validation_error");
    assert!(
        missing_price.body["message"]
            .as_str()
            .unwrap()
            .contains("unit_price")
    );

    let wrong_type = app
        .post(
            "/api/buys",
            json!({ "inventory_id": app.inventory_id, "quantity": "three", "unit_price": "5" }),
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["error"], "validation_error");

    let too_precise = app
        .post(
            "/api/buys",
            json!({ "inventory_id": app.inventory_id, "quantity": 3, "unit_price": "0.00001" }),
        )
        .await;
    assert_eq!(too_precise.status, StatusCode::BAD_REQUEST);

    let movements = app.get("/api/movements").await;
    assert_eq!(movements.body, json!([]));
}

#[tokio::test]
async fn test_guarded_movement_delete_conflicts() {
    let app = setup().await;
    let id = app.create_expense("transport", 5).await;

    let related = app.get(&format!("/api/movements/{id}/related")).await;
    assert_eq!(related.body["has_related_records"], json!(true));

    let delete = app.delete(&format!("/api/movements/{id}")).await;
    assert_eq!(delete.status, StatusCode::CONFLICT);

    let update = app
        .put(
            &format!("/api/movements/{id}"),
            json!({ "inventory_id": app.inventory_id, "quantity": 9 }),
        )
        .await;
    assert_eq!(update.status, StatusCode::CONFLICT);

    assert_eq!(app.get(&format!("/api/expenses/{id}")).await.status, StatusCode::OK);
    let movement = app.get(&format!("/api/movements/{id}")).await;
    assert_eq!(movement.status, StatusCode::OK);
    assert_eq!(movement.body["quantity"], 1);
}

#[tokio::test]
async fn test_delete_buy_removes_both_rows() {
    let app = setup().await;
    let id = app.create_buy(2, 5, "10").await;

    let delete = app.delete(&format!("/api/buys/{id}")).await;
    assert_eq!(delete.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get(&format!("/api/buys/{id}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&format!("/api/movements/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&format!("/api/buys/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_update_buy_and_wrong_kind() {
    let app = setup().await;
    let id = app.create_buy(2, 5, "10").await;

    let update = app
        .put(
            &format!("/api/buys/{id}"),
            json!({
                "inventory_id": app.inventory_id,
                "quantity": 7,
                "movement_date": "2025-01-06T12:00:00Z",
                "unit_price": "11"
            }),
        )
        .await;
    assert_eq!(update.status, StatusCode::NO_CONTENT);

    let fetched = app.get(&format!("/api/buys/{id}")).await;
    assert_eq!(fetched.body["quantity"], 7);

    let as_sell = app
        .put(
            &format!("/api/sells/{id}"),
            json!({ "inventory_id": app.inventory_id, "quantity": 1, "sale_price": "1" }),
        )
        .await;
    assert_eq!(as_sell.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filters() {
    let app = setup().await;
    app.create_buy(1, 2, "10").await;
    app.create_buy(1, 20, "10").await;
    app.create_expense("rent", 3).await;

    let january = app
        .get("/api/buys/date-range?startDate=2025-01-01T00:00:00Z&endDate=2025-01-10T00:00:00Z")
        .await;
    assert_eq!(january.status, StatusCode::OK);
    assert_eq!(january.body.as_array().unwrap().len(), 1);

    let reversed = app
        .get("/api/movements/date-range?startDate=2025-02-01T00:00:00Z&endDate=2025-01-01T00:00:00Z")
        .await;
    assert_eq!(reversed.status, StatusCode::BAD_REQUEST);

    let by_product = app
        .get(&format!("/api/movements/product/{}", app.product_id))
        .await;
    assert_eq!(by_product.body.as_array().unwrap().len(), 3);

    let rent = app.get("/api/expenses/type/rent").await;
    assert_eq!(rent.body.as_array().unwrap().len(), 1);
    assert_eq!(
        app.get("/api/expenses/type/bribes").await.status,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_full_view_and_referenced_catalog_rows() {
    let app = setup().await;
    let id = app.create_buy(1, 2, "10").await;

    let full = app.get(&format!("/api/buys/{id}/full")).await;
    assert_eq!(full.status, StatusCode::OK);
    assert_eq!(full.body["inventory"]["product_name"], "Yerba");
    assert_eq!(full.body["inventory"]["warehouse_name"], "Central");
    assert_eq!(full.body["kind"], "buy");

    let product = app.delete(&format!("/api/products/{}", app.product_id)).await;
    assert_eq!(product.status, StatusCode::CONFLICT);

    let inventory = app
        .delete(&format!("/api/inventories/{}", app.inventory_id))
        .await;
    assert_eq!(inventory.status, StatusCode::CONFLICT);
}
