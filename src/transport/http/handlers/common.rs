//! Maps service failures onto the two response families.
//!
//! Category and order routes answer with `{success:false, message}`; product mutations
//! answer with `{error}`. Store failures are 500 with the raw error attached, in both.

use crate::app::ServiceError;
use crate::storage::StoreError;
use crate::transport::http::types::{MessageResponse, ProductErrorResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

/// Parses a path id. Malformed ids cannot match a record, so callers treat them as absent.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn internal(err: ServiceError, context: &str) -> Response {
    tracing::error!(error = %err, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse {
            success: false,
            message: context.to_string(),
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

/// `{success:false, message}` family.
pub fn message_failure(err: ServiceError, context: &str) -> Response {
    match err {
        ServiceError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(MessageResponse::failed(message))).into_response()
        }
        ServiceError::Field(violation) => (
            StatusCode::from_u16(violation.status).unwrap_or(StatusCode::BAD_REQUEST),
            Json(MessageResponse::failed(violation.message)),
        )
            .into_response(),
        ServiceError::Conflict(message) => {
            (StatusCode::CONFLICT, Json(MessageResponse::failed(message))).into_response()
        }
        ServiceError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(MessageResponse::failed(message))).into_response()
        }
        ServiceError::Store(StoreError::InvalidRecord(detail)) => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                success: false,
                message: context.to_string(),
                error: Some(detail),
            }),
        )
            .into_response(),
        other => internal(other, context),
    }
}

/// `{error}` family used by product create/update.
pub fn error_failure(err: ServiceError, context: &str) -> Response {
    let (status, error) = match err {
        ServiceError::Field(violation) => (
            StatusCode::from_u16(violation.status).unwrap_or(StatusCode::BAD_REQUEST),
            violation.message,
        ),
        ServiceError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        ServiceError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        ServiceError::Conflict(message) => (StatusCode::CONFLICT, message),
        other => return internal(other, context),
    };
    (status, Json(ProductErrorResponse { error })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FieldViolation;

    #[test]
    fn field_violation_keeps_its_status() {
        let resp = error_failure(
            ServiceError::Field(FieldViolation {
                status: 400,
                message: "Name is Required".to_string(),
            }),
            "Error in creating product",
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn families_share_status_codes() {
        let conflict = message_failure(ServiceError::Conflict("dup".into()), "ctx");
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        let missing = error_failure(ServiceError::NotFound("Product not found".into()), "ctx");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let invalid = message_failure(
            ServiceError::Store(StoreError::InvalidRecord("bad status".into())),
            "ctx",
        );
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        let broken = message_failure(
            ServiceError::Store(StoreError::Corrupt("bytes".into())),
            "ctx",
        );
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_none());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
    }
}
