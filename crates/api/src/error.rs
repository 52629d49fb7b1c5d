//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use mazerp_core::auth::AuthError;
use mazerp_core::catalog::CatalogError;
use mazerp_core::movement::MovementError;
use mazerp_shared::{AppError, JwtError};

/// Error returned by handlers, rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.error_code().to_lowercase();

        let message = if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<MovementError> for ApiError {
    fn from(err: MovementError) -> Self {
        Self(err.into())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerp_shared::types::MovementId;
    use rstest::rstest;

    #[rstest]
    #[case(MovementError::HasRelatedRecords(MovementId::new(1)).into(), StatusCode::CONFLICT)]
    #[case(MovementError::NotFound(MovementId::new(1)).into(), StatusCode::NOT_FOUND)]
    #[case(MovementError::ZeroQuantity.into(), StatusCode::BAD_REQUEST)]
    #[case(CatalogError::InUse("x".into()).into(), StatusCode::CONFLICT)]
    #[case(AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED)]
    #[case(DbErr::Custom("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
        assert_eq!(err.into_response().status(), expected);
    }
}
