use crate::error::ProvisioningError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// A `ProvisioningError` tagged with the HTTP operation that failed.
///
/// Renders as `{"operation", "error", "message"}`; unknown merchant ids are
/// also listed under `invalidIds`.
#[derive(Debug)]
pub struct ApiError {
    pub operation: &'static str,
    pub error: ProvisioningError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(operation = self.operation, error = %self.error, "request failed");
        }

        let mut body = json!({
            "operation": self.operation,
            "error": self.error.code(),
            "message": self.error.to_string(),
        });
        if let ProvisioningError::InvalidMerchantIds(ids) = &self.error {
            body["invalidIds"] = json!(ids);
        }
        (status, Json(body)).into_response()
    }
}

pub trait Operation<T> {
    /// Attaches the failing operation's name to an error.
    fn during(self, operation: &'static str) -> Result<T, ApiError>;
}

impl<T> Operation<T> for crate::error::Result<T> {
    fn during(self, operation: &'static str) -> Result<T, ApiError> {
        self.map_err(|error| ApiError { operation, error })
    }
}
