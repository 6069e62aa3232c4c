use crate::error::ProvisioningError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a provisioned token.
///
/// `Active`, `Inactive` and `Suspended` are freely navigable between each
/// other. Any state may move to `Deleted`; nothing leaves `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenStatus {
    Active,
    Inactive,
    Suspended,
    Deleted,
}

const TOKEN_STATUS_WIRE: [(TokenStatus, &str); 4] = [
    (TokenStatus::Active, "ACTIVE"),
    (TokenStatus::Inactive, "INACTIVE"),
    (TokenStatus::Suspended, "SUSPENDED"),
    (TokenStatus::Deleted, "DELETED"),
];

impl TokenStatus {
    pub fn as_wire(&self) -> &'static str {
        TOKEN_STATUS_WIRE
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, wire)| *wire)
            .unwrap_or("DELETED")
    }

    /// Case-insensitive lookup in the wire mapping table.
    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        TOKEN_STATUS_WIRE
            .iter()
            .find(|(_, wire)| wire.eq_ignore_ascii_case(value))
            .map(|(status, _)| *status)
    }

    /// `DELETED` is the only terminal status; every other status may move to
    /// any status, `DELETED` included.
    pub fn is_terminal(&self) -> bool {
        *self == TokenStatus::Deleted
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for TokenStatus {
    type Err = ProvisioningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| ProvisioningError::InvalidStatus(s.to_string()))
    }
}

/// Per-merchant result of a push provisioning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProvisioningOutcome {
    Success,
    Failed,
    Pending,
}

const OUTCOME_WIRE: [(ProvisioningOutcome, &str); 3] = [
    (ProvisioningOutcome::Success, "SUCCESS"),
    (ProvisioningOutcome::Failed, "FAILED"),
    (ProvisioningOutcome::Pending, "PENDING"),
];

impl ProvisioningOutcome {
    pub fn as_wire(&self) -> &'static str {
        OUTCOME_WIRE
            .iter()
            .find(|(outcome, _)| outcome == self)
            .map(|(_, wire)| *wire)
            .unwrap_or("FAILED")
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        OUTCOME_WIRE
            .iter()
            .find(|(_, wire)| wire.eq_ignore_ascii_case(value))
            .map(|(outcome, _)| *outcome)
    }
}

impl fmt::Display for ProvisioningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Token expiry as reported by the gateway: a `YYYYMM` year-month string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenExpiry(String);

impl TokenExpiry {
    pub fn new(value: &str) -> Result<Self, ProvisioningError> {
        let value = value.trim();
        let well_formed = value.len() == 6
            && value.chars().all(|c| c.is_ascii_digit())
            && matches!(value[4..].parse::<u8>(), Ok(1..=12));
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(ProvisioningError::InvalidRequest(format!(
                "token expiry must be YYYYMM, got {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TokenExpiry {
    type Error = ProvisioningError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TokenExpiry> for String {
    fn from(expiry: TokenExpiry) -> Self {
        expiry.0
    }
}

impl fmt::Display for TokenExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing view of a provisioned token.
///
/// Single-token lookups may not carry `merchant_id` or `created_at` when the
/// gateway omits them; list entries always do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub token_reference_id: String,
    pub merchant_id: Option<String>,
    pub merchant_name: String,
    pub token_status: TokenStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expiry: TokenExpiry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
    pub tokens: Vec<TokenInfo>,
    pub total_count: usize,
    pub response_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdateResponse {
    pub token_reference_id: String,
    pub token_status: TokenStatus,
    pub last_updated_at: DateTime<Utc>,
    /// `SUCCESS` or `FAILED`, as confirmed by the gateway.
    pub update_result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDeletion {
    pub token_reference_id: String,
    /// `SUCCESS`, or `ALREADY_DELETED` on repeated deletes.
    pub deletion_result: String,
    pub deleted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_mapping() {
        assert_eq!(TokenStatus::from_wire("ACTIVE"), Some(TokenStatus::Active));
        assert_eq!(TokenStatus::from_wire("suspended"), Some(TokenStatus::Suspended));
        assert_eq!(TokenStatus::from_wire(" Inactive "), Some(TokenStatus::Inactive));
        assert_eq!(TokenStatus::from_wire("FROZEN"), None);
        assert_eq!(TokenStatus::Deleted.as_wire(), "DELETED");
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        assert!(matches!(
            "PAUSED".parse::<TokenStatus>(),
            Err(ProvisioningError::InvalidStatus(s)) if s == "PAUSED"
        ));
    }

    #[test]
    fn test_only_deleted_is_terminal() {
        use TokenStatus::*;
        for status in [Active, Inactive, Suspended] {
            assert!(!status.is_terminal(), "{status}");
        }
        assert!(Deleted.is_terminal());
    }

    #[test]
    fn test_outcome_wire_mapping() {
        assert_eq!(
            ProvisioningOutcome::from_wire("pending"),
            Some(ProvisioningOutcome::Pending)
        );
        assert_eq!(ProvisioningOutcome::from_wire("DECLINED"), None);
        assert_eq!(ProvisioningOutcome::Success.to_string(), "SUCCESS");
    }

    #[test]
    fn test_expiry_validation() {
        let expiry = TokenExpiry::new("202701").unwrap();
        assert_eq!(expiry.as_str(), "202701");
        assert!(TokenExpiry::new("202713").is_err());
        assert!(TokenExpiry::new("2027-01").is_err());
        assert!(TokenExpiry::new("20270").is_err());
    }
}
