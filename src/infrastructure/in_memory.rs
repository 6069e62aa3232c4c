use crate::domain::catalog::ReferenceCatalog;
use crate::domain::gateway::{
    CreateTokensRequest, GatewayProvisioningEntry, GatewayProvisioningResponse,
    GatewayTokenDeletion, GatewayTokenDetail, GatewayTokenEntry, GatewayTokenList,
    GatewayTokenUpdate, format_gateway_timestamp,
};
use crate::domain::ports::{RequestTracker, TokenGateway};
use crate::domain::provisioning::ProvisioningStatusSnapshot;
use crate::domain::token::{ProvisioningOutcome, TokenStatus};
use crate::error::{ProvisioningError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Tokens are issued with a three year lifetime.
const TOKEN_LIFETIME_DAYS: i64 = 1095;

#[derive(Debug, Clone)]
struct StoredToken {
    token_reference_id: String,
    card_identifier: String,
    merchant_id: String,
    merchant_name: String,
    status: TokenStatus,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    expiry: String,
    sequence: u64,
}

impl StoredToken {
    fn entry(&self) -> GatewayTokenEntry {
        GatewayTokenEntry {
            token_reference_id: Some(self.token_reference_id.clone()),
            merchant_id: Some(self.merchant_id.clone()),
            merchant_name: Some(self.merchant_name.clone()),
            token_status: Some(self.status.as_wire().to_string()),
            created_timestamp: Some(format_gateway_timestamp(self.created_at)),
            last_updated_timestamp: Some(format_gateway_timestamp(self.last_updated_at)),
            last_used_timestamp: None,
            token_expiry_date: Some(self.expiry.clone()),
        }
    }

    fn detail(&self) -> GatewayTokenDetail {
        GatewayTokenDetail {
            token_reference_id: Some(self.token_reference_id.clone()),
            token_status: Some(self.status.as_wire().to_string()),
            merchant_id: Some(self.merchant_id.clone()),
            merchant_name: Some(self.merchant_name.clone()),
            created_timestamp: Some(format_gateway_timestamp(self.created_at)),
            last_updated_timestamp: Some(format_gateway_timestamp(self.last_updated_at)),
            last_used_timestamp: None,
            token_expiry_date: Some(self.expiry.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct GatewayState {
    tokens: HashMap<String, StoredToken>,
    next_sequence: u64,
}

impl GatewayState {
    fn fresh_token_reference_id(&self) -> String {
        loop {
            let candidate = format!(
                "TKN_{}",
                &Uuid::new_v4().simple().to_string()[..8].to_ascii_uppercase()
            );
            if !self.tokens.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

/// An in-process token gateway backed by a `HashMap` keyed by token
/// reference id.
///
/// Behaves like a faithful token store rather than a stateless mock: status
/// changes persist, `DELETED` is terminal, and a deleted token stays visible
/// for exactly one confirming read, after which it is dropped from the store.
#[derive(Clone)]
pub struct InMemoryTokenGateway {
    catalog: Arc<ReferenceCatalog>,
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryTokenGateway {
    /// Creates an empty gateway that recognizes the catalog's merchants.
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self {
            catalog,
            state: Arc::new(RwLock::new(GatewayState::default())),
        }
    }
}

#[async_trait]
impl TokenGateway for InMemoryTokenGateway {
    async fn create_tokens(
        &self,
        request: CreateTokensRequest,
    ) -> Result<GatewayProvisioningResponse> {
        let now = Utc::now();
        let expiry = (now + Duration::days(TOKEN_LIFETIME_DAYS))
            .format("%Y%m")
            .to_string();

        let mut state = self.state.write().await;
        let mut results = Vec::with_capacity(request.merchant_names.len());

        for name in &request.merchant_names {
            let Some(merchant) = self.catalog.find_merchant_by_name(name) else {
                debug!(merchant = %name, "skipping unknown merchant");
                continue;
            };

            let token = StoredToken {
                token_reference_id: state.fresh_token_reference_id(),
                card_identifier: request.card_identifier.clone(),
                merchant_id: merchant.external_merchant_id.clone(),
                merchant_name: merchant.name.clone(),
                status: TokenStatus::Active,
                created_at: now,
                last_updated_at: now,
                expiry: expiry.clone(),
                sequence: state.next_sequence,
            };
            state.next_sequence += 1;

            results.push(GatewayProvisioningEntry {
                merchant_id: Some(token.merchant_id.clone()),
                merchant_name: Some(token.merchant_name.clone()),
                token_reference_id: Some(token.token_reference_id.clone()),
                token_status: Some(token.status.as_wire().to_string()),
                provisioning_result: Some(ProvisioningOutcome::Success.as_wire().to_string()),
                token_expiry_date: Some(token.expiry.clone()),
                created_timestamp: Some(format_gateway_timestamp(now)),
                last_updated_timestamp: Some(format_gateway_timestamp(now)),
            });
            state
                .tokens
                .insert(token.token_reference_id.clone(), token);
        }

        Ok(GatewayProvisioningResponse {
            request_id: Some(Uuid::new_v4().to_string()),
            status: Some("ACCEPTED".to_string()),
            timestamp: Some(format_gateway_timestamp(now)),
            push_provisioning_results: Some(results),
        })
    }

    async fn list_tokens(&self, card_identifier: &str) -> Result<GatewayTokenList> {
        let state = self.state.read().await;
        let mut tokens: Vec<&StoredToken> = state
            .tokens
            .values()
            .filter(|t| t.card_identifier == card_identifier && !t.status.is_terminal())
            .collect();
        tokens.sort_by_key(|t| t.sequence);

        let entries: Vec<GatewayTokenEntry> = tokens.into_iter().map(StoredToken::entry).collect();
        Ok(GatewayTokenList {
            total_count: Some(entries.len()),
            tokens: Some(entries),
            response_timestamp: Some(format_gateway_timestamp(Utc::now())),
        })
    }

    async fn get_token(&self, token_reference_id: &str) -> Result<Option<GatewayTokenDetail>> {
        let mut state = self.state.write().await;
        let Some(token) = state.tokens.get(token_reference_id) else {
            return Ok(None);
        };
        let detail = token.detail();
        if token.status.is_terminal() {
            // The confirming read is the last one; the token is forgotten.
            state.tokens.remove(token_reference_id);
        }
        Ok(Some(detail))
    }

    async fn update_token(
        &self,
        token_reference_id: &str,
        status: &str,
    ) -> Result<Option<GatewayTokenUpdate>> {
        let next = TokenStatus::from_wire(status)
            .ok_or_else(|| ProvisioningError::InvalidStatus(status.to_string()))?;

        let mut state = self.state.write().await;
        let Some(token) = state.tokens.get_mut(token_reference_id) else {
            return Ok(None);
        };

        let update_result = if !token.status.is_terminal() {
            token.status = next;
            token.last_updated_at = Utc::now();
            "SUCCESS"
        } else {
            debug!(from = %token.status, to = %next, "rejecting illegal transition");
            "FAILED"
        };

        Ok(Some(GatewayTokenUpdate {
            token_reference_id: Some(token.token_reference_id.clone()),
            token_status: Some(token.status.as_wire().to_string()),
            last_updated_timestamp: Some(format_gateway_timestamp(token.last_updated_at)),
            update_result: Some(update_result.to_string()),
        }))
    }

    async fn delete_token(
        &self,
        token_reference_id: &str,
    ) -> Result<Option<GatewayTokenDeletion>> {
        let mut state = self.state.write().await;
        let Some(token) = state.tokens.get_mut(token_reference_id) else {
            return Ok(None);
        };

        let deletion_result = if token.status.is_terminal() {
            "ALREADY_DELETED"
        } else {
            token.status = TokenStatus::Deleted;
            token.last_updated_at = Utc::now();
            "SUCCESS"
        };

        Ok(Some(GatewayTokenDeletion {
            token_reference_id: Some(token.token_reference_id.clone()),
            deletion_result: Some(deletion_result.to_string()),
            deleted_timestamp: Some(format_gateway_timestamp(token.last_updated_at)),
        }))
    }
}

/// Snapshots retained by a default tracker before the oldest are evicted.
pub const DEFAULT_TRACKED_REQUESTS: usize = 10_000;

#[derive(Debug, Default)]
struct TrackerState {
    snapshots: HashMap<String, ProvisioningStatusSnapshot>,
    /// Request ids, oldest first.
    order: VecDeque<String>,
}

/// A thread-safe in-memory record of provisioning requests.
///
/// Keeps at most `capacity` snapshots; recording past that evicts the oldest
/// request, whose status then reads as unknown.
#[derive(Clone)]
pub struct InMemoryRequestTracker {
    state: Arc<RwLock<TrackerState>>,
    capacity: usize,
}

impl InMemoryRequestTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TRACKED_REQUESTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(TrackerState::default())),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryRequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestTracker for InMemoryRequestTracker {
    async fn record(&self, snapshot: ProvisioningStatusSnapshot) -> Result<()> {
        let mut state = self.state.write().await;
        let request_id = snapshot.request_id.clone();
        if state.snapshots.insert(request_id.clone(), snapshot).is_none() {
            state.order.push_back(request_id);
        }
        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                debug!(request_id = %oldest, "evicting tracked provisioning request");
                state.snapshots.remove(&oldest);
            }
        }
        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<ProvisioningStatusSnapshot>> {
        let state = self.state.read().await;
        Ok(state.snapshots.get(request_id).cloned())
    }
}
