// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Only `Configuration` and `Generation` are expected to reach a user during
/// normal operation. Catalog, enrichment and corruption errors are recovered
/// where they happen and exist so the recovery can be logged with a type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("AI service is not configured: {0}")]
    Configuration(String),

    #[error("Workout generation failed: {0}")]
    Generation(String),

    #[error("Exercise catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("Stored record '{key}' is corrupt: {reason}")]
    PersistenceCorruption { key: String, reason: String },

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("Action not allowed: {0}")]
    InvalidState(String),

    #[error("No active profile")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Hint shown alongside generation and configuration failures.
    pub const CREDENTIAL_HINT: &'static str =
        "Check that GEMINI_API_KEY is configured correctly in the environment.";

    /// True for errors the pipeline recovers from internally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::CatalogUnavailable(_)
                | AppError::Enrichment(_)
                | AppError::PersistenceCorruption { .. }
        )
    }

    /// Log a failure the caller degrades from and return `fallback`.
    pub fn recover<T>(self, fallback: T, action: &'static str) -> T {
        if self.is_recoverable() {
            tracing::warn!(error = %self, action, "Recovered from error");
        } else {
            tracing::error!(error = %self, action, "Unexpected error while degrading");
        }
        fallback
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, hint) = match &self {
            AppError::Configuration(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "configuration_error",
                Some(msg.clone()),
                Some(AppError::CREDENTIAL_HINT),
            ),
            AppError::Generation(msg) => (
                StatusCode::BAD_GATEWAY,
                "generation_error",
                Some(msg.clone()),
                Some(AppError::CREDENTIAL_HINT),
            ),
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, "invalid_state", Some(msg.clone()), None)
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "no_profile", None, None),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found", Some(msg.clone()), None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()), None)
            }
            AppError::Persistence(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    Some(msg.clone()),
                    None,
                )
            }
            AppError::CatalogUnavailable(_)
            | AppError::Enrichment(_)
            | AppError::PersistenceCorruption { .. } => {
                tracing::warn!(error = %self, "Recoverable error escaped to a handler");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None, None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            hint,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
