//! Request body extraction.

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::ApiError;
use mazerp_shared::AppError;

/// JSON body whose rejections render through [`ApiError`] as 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}
