//! Error types for the dashboard HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::filter::FilterError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Market segment not present in the filtered view
    MarketNotFound(String),
    /// Invalid parameter in request
    InvalidParameter(String),
    /// Invalid founded-year range
    InvalidYearRange(String),
    /// Internal server error
    InternalError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MarketNotFound(market) => write!(f, "Market not found: {}", market),
            ApiError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            ApiError::InvalidYearRange(msg) => write!(f, "Invalid year range: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::MarketNotFound(market) => (
                StatusCode::NOT_FOUND,
                "MarketNotFound",
                format!("Market '{}' not found in the filtered data", market),
            ),
            ApiError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidParameter", msg.clone())
            }
            ApiError::InvalidYearRange(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidYearRange", msg.clone())
            }
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// Conversions from other error types

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidYearRange(start, end) => ApiError::InvalidYearRange(format!(
                "Start year {} is after end year {}",
                start, end
            )),
        }
    }
}

impl From<crate::dataset::DatasetError> for ApiError {
    fn from(err: crate::dataset::DatasetError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
