use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("Invalid merchant app IDs: {0:?}")]
    InvalidMerchantIds(Vec<i64>),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid token status: {0}")]
    InvalidStatus(String),
    #[error("Token not found: {0}")]
    TokenNotFound(String),
    #[error("Provisioning request not found: {0}")]
    RequestNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("{operation}: token gateway unavailable: {reason}")]
    GatewayUnavailable {
        operation: &'static str,
        reason: String,
    },
    #[error("{operation}: malformed gateway response: {reason}")]
    MalformedGatewayResponse {
        operation: &'static str,
        reason: String,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ProvisioningError {
    pub fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedGatewayResponse {
            operation,
            reason: reason.into(),
        }
    }

    pub fn unavailable(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::GatewayUnavailable {
            operation,
            reason: reason.into(),
        }
    }

    /// HTTP-equivalent status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidMerchantIds(_) | Self::InvalidRequest(_) | Self::InvalidStatus(_) => 400,
            Self::TokenNotFound(_) | Self::RequestNotFound(_) | Self::TransactionNotFound(_) => {
                404
            }
            Self::GatewayUnavailable { .. } | Self::MalformedGatewayResponse { .. } => 502,
            Self::CsvError(_) | Self::JsonError(_) | Self::IoError(_) | Self::InternalError(_) => {
                500
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMerchantIds(_) => "INVALID_MERCHANT_IDS",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::TokenNotFound(_) => "TOKEN_NOT_FOUND",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::GatewayUnavailable { .. } => "GATEWAY_UNAVAILABLE",
            Self::MalformedGatewayResponse { .. } => "MALFORMED_GATEWAY_RESPONSE",
            Self::CsvError(_) | Self::JsonError(_) | Self::IoError(_) | Self::InternalError(_) => {
                "INTERNAL_ERROR"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisioningError>;
