//! Registration and login for users and clients.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::info;

use crate::{AppState, error::ApiError, extract::JsonBody};
use mazerp_core::auth::{AuthError, Credentials};
use mazerp_db::AccountRepository;
use mazerp_shared::AccountKind;
use mazerp_shared::auth::{AccountInfo, LoginRequest, LoginResponse, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
        .route("/clients/register", post(register_client))
        .route("/clients/login", post(login_client))
}

fn repository(state: &AppState, kind: AccountKind) -> AccountRepository {
    AccountRepository::new((*state.db).clone(), kind)
}

/// POST /users/register
async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Response, ApiError> {
    register(&repository(&state, AccountKind::User), payload).await
}

/// POST /clients/register
async fn register_client(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Response, ApiError> {
    register(&repository(&state, AccountKind::Client), payload).await
}

/// POST /users/login
async fn login_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    login(&state, &repository(&state, AccountKind::User), payload).await
}

/// POST /clients/login
async fn login_client(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    login(&state, &repository(&state, AccountKind::Client), payload).await
}

async fn register(repo: &AccountRepository, payload: RegisterRequest) -> Result<Response, ApiError> {
    let credentials = Credentials::validate(&payload.name, &payload.password)?;

    if repo.name_exists(&credentials.name).await? {
        return Err(AuthError::NameTaken(credentials.name).into());
    }

    let password_hash = credentials.hash()?;
    let account = repo.create(&credentials.name, &password_hash).await?;

    info!(account_id = account.id, kind = %account.kind, "Account registered");

    let body = AccountInfo {
        id: account.id,
        name: account.name,
        kind: account.kind,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn login(
    state: &AppState,
    repo: &AccountRepository,
    payload: LoginRequest,
) -> Result<Response, ApiError> {
    let credentials = Credentials::validate(&payload.name, &payload.password)?;

    let Some(account) = repo.find_by_name(&credentials.name).await? else {
        info!(name = %credentials.name, kind = %repo.kind(), "Login attempt for unknown account");
        return Err(AuthError::InvalidCredentials.into());
    };

    if let Err(e) = credentials.verify(&account.password_hash) {
        info!(account_id = account.id, kind = %account.kind, "Failed login attempt");
        return Err(e.into());
    }

    let token = state
        .jwt_service
        .issue(account.id, &account.name, account.kind)?;

    info!(account_id = account.id, kind = %account.kind, "Logged in");

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.expires_in(),
        account: AccountInfo {
            id: account.id,
            name: account.name,
            kind: account.kind,
        },
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}
