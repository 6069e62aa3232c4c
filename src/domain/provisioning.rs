use super::merchant::MerchantApp;
use super::token::{ProvisioningOutcome, TokenExpiry, TokenStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inbound batch provisioning request. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    /// Any integer is accepted here; ids outside the catalog are reported by
    /// the orchestrator rather than rejected while decoding.
    #[serde(alias = "merchant_app_ids")]
    pub merchant_app_ids: BTreeSet<i64>,
    #[serde(alias = "card_identifier")]
    pub card_identifier: String,
}

impl ProvisioningRequest {
    pub fn new(merchant_app_ids: impl IntoIterator<Item = i64>, card_identifier: &str) -> Self {
        Self {
            merchant_app_ids: merchant_app_ids.into_iter().collect(),
            card_identifier: card_identifier.to_string(),
        }
    }
}

/// Outcome of provisioning a token into one merchant wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResult {
    pub merchant_id: String,
    pub merchant_name: String,
    pub token_reference_id: String,
    pub token_status: TokenStatus,
    pub outcome: ProvisioningOutcome,
    pub expiry: TokenExpiry,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResponse {
    pub request_id: String,
    /// The gateway's own top-level status, passed through unchanged.
    pub overall_status: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<ProvisioningResult>,
}

impl ProvisioningResponse {
    pub fn count_outcome(&self, outcome: ProvisioningOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    /// Every merchant reported a final outcome.
    Completed,
    /// At least one merchant is still pending at the gateway.
    Pending,
}

/// Tracked state of a previously submitted provisioning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningStatusSnapshot {
    pub request_id: String,
    pub state: RequestState,
    pub gateway_status: String,
    pub merchant_count: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub pending: usize,
    pub recorded_at: DateTime<Utc>,
}

impl From<&ProvisioningResponse> for ProvisioningStatusSnapshot {
    fn from(response: &ProvisioningResponse) -> Self {
        let pending = response.count_outcome(ProvisioningOutcome::Pending);
        Self {
            request_id: response.request_id.clone(),
            state: if pending > 0 {
                RequestState::Pending
            } else {
                RequestState::Completed
            },
            gateway_status: response.overall_status.clone(),
            merchant_count: response.results.len(),
            succeeded: response.count_outcome(ProvisioningOutcome::Success),
            failed: response.count_outcome(ProvisioningOutcome::Failed),
            pending,
            recorded_at: Utc::now(),
        }
    }
}

/// Event emitted once a provisioning response has been produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningCompleted {
    pub request_id: String,
    pub merchant_count: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDirectory {
    pub merchants: Vec<MerchantApp>,
    pub total_count: usize,
    pub response_timestamp: DateTime<Utc>,
}
