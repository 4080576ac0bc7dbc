use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use refdata_core::{DomainError, EntityId};

/// Map a domain failure to its HTTP shape.
///
/// Validation carries every broken rule in an `errors` array; everything else
/// is a single `error` code + message.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(rules) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": "validation failed",
                "errors": rules,
            })),
        )
            .into_response(),
        DomainError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DomainError::DuplicateKey { .. } => {
            json_error(StatusCode::CONFLICT, "duplicate_key", err.to_string())
        }
        DomainError::ReferenceNotFound { .. } => {
            json_error(StatusCode::BAD_REQUEST, "reference_not_found", err.to_string())
        }
        DomainError::ResourceInUse { .. } => {
            json_error(StatusCode::CONFLICT, "resource_in_use", err.to_string())
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string()),
        DomainError::Storage(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path/body identifier, rejecting garbage and the nil UUID.
pub fn parse_id(raw: &str) -> Result<EntityId, axum::response::Response> {
    raw.parse().map_err(|_| {
        json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed record id")
    })
}

/// Parse an optional identifier (absent stays absent).
pub fn parse_opt_id(raw: Option<&str>) -> Result<Option<EntityId>, axum::response::Response> {
    match raw {
        Some(s) => parse_id(s).map(Some),
        None => Ok(None),
    }
}
