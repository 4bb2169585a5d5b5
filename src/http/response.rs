//! Response envelopes. Every body carries `success`; failures add a
//! human-readable `message` and, depending on the class, `error` or `errors`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{CatalogError, FieldError};

pub const NOT_FOUND_MESSAGE: &str = "Plant not found";
pub const VALIDATION_MESSAGE: &str = "Validation error";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
pub const DELETED_MESSAGE: &str = "Plant deleted successfully";

/// The `{success, ...}` body shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            count: None,
            data: None,
            message: None,
            error: None,
            errors: None,
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(true)
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A list body with its `count`.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            data: Some(items),
            ..Self::empty(true)
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(false)
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match self {
            CatalogError::Validation(errors) => {
                tracing::warn!(fields = errors.len(), "rejecting invalid plant payload");
                ApiResponse {
                    errors: Some(errors),
                    ..ApiResponse::failure(VALIDATION_MESSAGE)
                }
            }
            CatalogError::NotFound(id) => {
                tracing::warn!(plant_id = %id, "plant not found");
                ApiResponse::failure(NOT_FOUND_MESSAGE)
            }
            CatalogError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                ApiResponse {
                    error: Some(err.to_string()),
                    ..ApiResponse::failure(SERVER_ERROR_MESSAGE)
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
