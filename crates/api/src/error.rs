//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::ValidationError;
use store::StoreError;
use thiserror::Error;
use workflow::CreateFullError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    CreateFull(#[from] CreateFullError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(err) => store_status(err),
            ApiError::CreateFull(err) => create_full_status(err),
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        StoreError::ForeignKeyViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::TransactionClosed | StoreError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn create_full_status(err: &CreateFullError) -> StatusCode {
    match err {
        _ if err.is_invalid_input() => StatusCode::BAD_REQUEST,
        CreateFullError::Persistence { source, .. } => store_status(source),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, status = status.as_u16(), "request failed");
        }
        metrics::counter!("api_errors_total", "status" => status.as_str().to_owned()).increment(1);

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow::Step;

    #[test]
    fn validation_failures_are_bad_requests() {
        let err: ApiError = CreateFullError::AddressInvalid(ValidationError::required("city")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "address invalid: city: is required");

        let err: ApiError = ValidationError::required("name").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_failures_use_the_store_classification() {
        let duplicate = CreateFullError::Persistence {
            step: Step::Supplier,
            source: StoreError::Duplicate {
                entity: "supplier",
                constraint: "unique_supplier_document".into(),
            },
        };
        assert_eq!(ApiError::from(duplicate).status(), StatusCode::CONFLICT);

        let missing = CreateFullError::Persistence {
            step: Step::CategoryRelation,
            source: StoreError::ForeignKeyViolation {
                entity: "supplier_category",
                constraint: "fk_relation_category".into(),
            },
        };
        assert_eq!(
            ApiError::from(missing).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn transaction_failures_are_internal() {
        for err in [
            CreateFullError::InvalidTransaction,
            CreateFullError::CommitFailed(StoreError::TransactionClosed),
            CreateFullError::RollbackFailed {
                cause: Box::new(CreateFullError::InvalidTransaction),
                rollback: StoreError::TransactionClosed,
            },
        ] {
            assert_eq!(
                ApiError::from(err).status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
