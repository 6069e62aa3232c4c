//! Wire shapes exchanged with the token-management gateway.
//!
//! Every field is optional on the wire types so that a missing value is
//! reported as a malformed response during normalization rather than as a
//! deserialization failure deep inside an adapter.

use super::merchant::CardDetails;
use super::provisioning::ProvisioningResult;
use super::token::{
    ProvisioningOutcome, TokenDeletion, TokenExpiry, TokenInfo, TokenListResponse, TokenStatus,
    TokenUpdateResponse,
};
use crate::error::{ProvisioningError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokensRequest {
    pub card_identifier: String,
    pub card: CardDetails,
    pub merchant_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProvisioningResponse {
    pub request_id: Option<String>,
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub push_provisioning_results: Option<Vec<GatewayProvisioningEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProvisioningEntry {
    pub merchant_id: Option<String>,
    pub merchant_name: Option<String>,
    pub token_reference_id: Option<String>,
    pub token_status: Option<String>,
    pub provisioning_result: Option<String>,
    pub token_expiry_date: Option<String>,
    pub created_timestamp: Option<String>,
    pub last_updated_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTokenList {
    pub tokens: Option<Vec<GatewayTokenEntry>>,
    pub total_count: Option<usize>,
    pub response_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTokenEntry {
    pub token_reference_id: Option<String>,
    pub merchant_id: Option<String>,
    pub merchant_name: Option<String>,
    pub token_status: Option<String>,
    pub created_timestamp: Option<String>,
    pub last_updated_timestamp: Option<String>,
    pub last_used_timestamp: Option<String>,
    pub token_expiry_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTokenDetail {
    pub token_reference_id: Option<String>,
    pub token_status: Option<String>,
    pub merchant_id: Option<String>,
    pub merchant_name: Option<String>,
    pub created_timestamp: Option<String>,
    pub last_updated_timestamp: Option<String>,
    pub last_used_timestamp: Option<String>,
    pub token_expiry_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTokenUpdate {
    pub token_reference_id: Option<String>,
    pub token_status: Option<String>,
    pub last_updated_timestamp: Option<String>,
    pub update_result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTokenDeletion {
    pub token_reference_id: Option<String>,
    pub deletion_result: Option<String>,
    pub deleted_timestamp: Option<String>,
}

/// Formats a timestamp the way it travels on the wire (`Z` suffix).
pub fn format_gateway_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

/// Parses a gateway timestamp.
///
/// Accepts RFC 3339 (including a trailing `Z`) and the offset-less ISO form,
/// which is taken to be UTC.
pub fn parse_gateway_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn required<'a>(
    value: &'a Option<String>,
    field: &str,
    operation: &'static str,
) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProvisioningError::malformed(
            operation,
            format!("missing field `{field}`"),
        )),
    }
}

fn timestamp(value: &str, field: &str, operation: &'static str) -> Result<DateTime<Utc>> {
    parse_gateway_timestamp(value).ok_or_else(|| {
        ProvisioningError::malformed(operation, format!("unparsable `{field}`: {value:?}"))
    })
}

fn required_timestamp(
    value: &Option<String>,
    field: &str,
    operation: &'static str,
) -> Result<DateTime<Utc>> {
    timestamp(required(value, field, operation)?, field, operation)
}

fn optional_timestamp(
    value: &Option<String>,
    field: &str,
    operation: &'static str,
) -> Result<Option<DateTime<Utc>>> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => timestamp(v, field, operation).map(Some),
        _ => Ok(None),
    }
}

fn status(value: &Option<String>, operation: &'static str) -> Result<TokenStatus> {
    let wire = required(value, "tokenStatus", operation)?;
    TokenStatus::from_wire(wire).ok_or_else(|| {
        ProvisioningError::malformed(operation, format!("unknown token status {wire:?}"))
    })
}

fn expiry(value: &Option<String>, operation: &'static str) -> Result<TokenExpiry> {
    let wire = required(value, "tokenExpiryDate", operation)?;
    TokenExpiry::new(wire).map_err(|_| {
        ProvisioningError::malformed(operation, format!("unparsable `tokenExpiryDate`: {wire:?}"))
    })
}

/// Header fields of a provisioning response, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningHeader {
    pub request_id: String,
    pub overall_status: String,
    pub timestamp: DateTime<Utc>,
}

impl GatewayProvisioningResponse {
    pub fn header(&self, operation: &'static str) -> Result<ProvisioningHeader> {
        Ok(ProvisioningHeader {
            request_id: required(&self.request_id, "requestId", operation)?.to_string(),
            overall_status: required(&self.status, "status", operation)?.to_string(),
            timestamp: required_timestamp(&self.timestamp, "timestamp", operation)?,
        })
    }
}

impl GatewayProvisioningEntry {
    pub fn normalize(&self, operation: &'static str) -> Result<ProvisioningResult> {
        let outcome_wire = required(&self.provisioning_result, "provisioningResult", operation)?;
        let outcome = ProvisioningOutcome::from_wire(outcome_wire).ok_or_else(|| {
            ProvisioningError::malformed(
                operation,
                format!("unknown provisioning result {outcome_wire:?}"),
            )
        })?;
        Ok(ProvisioningResult {
            merchant_id: required(&self.merchant_id, "merchantId", operation)?.to_string(),
            merchant_name: required(&self.merchant_name, "merchantName", operation)?.to_string(),
            token_reference_id: required(&self.token_reference_id, "tokenReferenceId", operation)?
                .to_string(),
            token_status: status(&self.token_status, operation)?,
            outcome,
            expiry: expiry(&self.token_expiry_date, operation)?,
            created_at: required_timestamp(
                &self.created_timestamp,
                "createdTimestamp",
                operation,
            )?,
            last_updated_at: required_timestamp(
                &self.last_updated_timestamp,
                "lastUpdatedTimestamp",
                operation,
            )?,
        })
    }
}

impl GatewayTokenEntry {
    pub fn normalize(&self, operation: &'static str) -> Result<TokenInfo> {
        Ok(TokenInfo {
            token_reference_id: required(&self.token_reference_id, "tokenReferenceId", operation)?
                .to_string(),
            merchant_id: Some(required(&self.merchant_id, "merchantId", operation)?.to_string()),
            merchant_name: required(&self.merchant_name, "merchantName", operation)?.to_string(),
            token_status: status(&self.token_status, operation)?,
            created_at: Some(required_timestamp(
                &self.created_timestamp,
                "createdTimestamp",
                operation,
            )?),
            last_updated_at: optional_timestamp(
                &self.last_updated_timestamp,
                "lastUpdatedTimestamp",
                operation,
            )?,
            last_used_at: optional_timestamp(
                &self.last_used_timestamp,
                "lastUsedTimestamp",
                operation,
            )?,
            expiry: expiry(&self.token_expiry_date, operation)?,
        })
    }
}

impl GatewayTokenList {
    /// Normalizes the listing; a reported count that disagrees with the
    /// number of entries is treated as malformed.
    pub fn normalize(&self, operation: &'static str) -> Result<TokenListResponse> {
        let tokens = self
            .tokens
            .as_deref()
            .ok_or_else(|| ProvisioningError::malformed(operation, "missing field `tokens`"))?
            .iter()
            .map(|entry| entry.normalize(operation))
            .collect::<Result<Vec<_>>>()?;
        let total_count = self
            .total_count
            .ok_or_else(|| ProvisioningError::malformed(operation, "missing field `totalCount`"))?;
        if total_count != tokens.len() {
            return Err(ProvisioningError::malformed(
                operation,
                format!(
                    "totalCount {total_count} does not match {} returned tokens",
                    tokens.len()
                ),
            ));
        }
        Ok(TokenListResponse {
            tokens,
            total_count,
            response_timestamp: required_timestamp(
                &self.response_timestamp,
                "responseTimestamp",
                operation,
            )?,
        })
    }
}

impl GatewayTokenDetail {
    pub fn normalize(&self, operation: &'static str) -> Result<TokenInfo> {
        Ok(TokenInfo {
            token_reference_id: required(&self.token_reference_id, "tokenReferenceId", operation)?
                .to_string(),
            merchant_id: self
                .merchant_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            merchant_name: required(&self.merchant_name, "merchantName", operation)?.to_string(),
            token_status: status(&self.token_status, operation)?,
            created_at: optional_timestamp(
                &self.created_timestamp,
                "createdTimestamp",
                operation,
            )?,
            last_updated_at: optional_timestamp(
                &self.last_updated_timestamp,
                "lastUpdatedTimestamp",
                operation,
            )?,
            last_used_at: optional_timestamp(
                &self.last_used_timestamp,
                "lastUsedTimestamp",
                operation,
            )?,
            expiry: expiry(&self.token_expiry_date, operation)?,
        })
    }
}

impl GatewayTokenUpdate {
    pub fn normalize(&self, operation: &'static str) -> Result<TokenUpdateResponse> {
        Ok(TokenUpdateResponse {
            token_reference_id: required(&self.token_reference_id, "tokenReferenceId", operation)?
                .to_string(),
            token_status: status(&self.token_status, operation)?,
            last_updated_at: required_timestamp(
                &self.last_updated_timestamp,
                "lastUpdatedTimestamp",
                operation,
            )?,
            update_result: required(&self.update_result, "updateResult", operation)?
                .to_ascii_uppercase(),
        })
    }
}

impl GatewayTokenDeletion {
    pub fn normalize(&self, operation: &'static str) -> Result<TokenDeletion> {
        Ok(TokenDeletion {
            token_reference_id: required(&self.token_reference_id, "tokenReferenceId", operation)?
                .to_string(),
            deletion_result: required(&self.deletion_result, "deletionResult", operation)?
                .to_ascii_uppercase(),
            deleted_at: required_timestamp(&self.deleted_timestamp, "deletedTimestamp", operation)?,
        })
    }
}
