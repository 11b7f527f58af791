//! Unified request-level error type for merchkit
//!
//! `AppError` is the single error that crosses the handler boundary. Variants
//! map one-to-one onto HTTP statuses so handlers can use `?` without manual
//! `.map_err(|e| { tracing::error!(...); ... })` boilerplate.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// External store or payment processor unreachable or returned a
    /// non-2xx response, with no fallback available.
    #[error("upstream service unavailable: {0}")]
    Upstream(String),

    /// Unknown product or record.
    #[error("{0} not found")]
    NotFound(String),

    /// Missing required field or malformed request body.
    #[error("{0}")]
    InvalidInput(String),

    /// Base product image absent from the products directory.
    #[error("asset missing: {0}")]
    AssetMissing(String),

    /// Logo could not be fetched or decoded.
    #[error("logo unavailable: {0}")]
    LogoUnavailable(String),

    /// Placement box is degenerate or out of bounds.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// Infrastructure error (S3, image encoding, serde). Detail is logged,
    /// the client gets a generic message.
    #[error("internal error")]
    Internal(BoxError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AssetMissing(_) => StatusCode::NOT_FOUND,
            Self::LogoUnavailable(_) => StatusCode::BAD_REQUEST,
            Self::InvalidPlacement(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap an infrastructure error.
    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            match &self {
                AppError::Internal(source) => {
                    tracing::error!(error = %source, "internal error")
                }
                other => tracing::error!(error = %other, "request failed"),
            }
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Convenience alias for handler results
pub type ApiResult<T> = Result<Json<T>, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            AppError::Upstream("airtable".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("product tote-bag".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("missing email".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AssetMissing("mug.png".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::LogoUnavailable("fetch failed".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidPlacement("zero width".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_name_the_asset() {
        let err = AppError::AssetMissing("assets/products/mug.png".into());
        assert_eq!(err.to_string(), "asset missing: assets/products/mug.png");
    }
}
