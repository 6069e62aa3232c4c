use super::notifications::NotificationQueue;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::gateway::{CreateTokensRequest, GatewayProvisioningResponse};
use crate::domain::merchant::MerchantApp;
use crate::domain::ports::{RequestTrackerBox, TokenGatewayRef};
use crate::domain::provisioning::{
    MerchantDirectory, ProvisioningCompleted, ProvisioningRequest, ProvisioningResponse,
    ProvisioningStatusSnapshot,
};
use crate::error::{ProvisioningError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const CREATE_TOKENS: &str = "create_tokens";

/// Entry point for push provisioning.
///
/// Validates a batch request against the catalog, hands it to the token
/// gateway in a single call and normalizes the per-merchant results. Holds no
/// per-request state of its own; concurrent calls need no coordination.
pub struct ProvisioningOrchestrator {
    catalog: Arc<ReferenceCatalog>,
    gateway: TokenGatewayRef,
    tracker: RequestTrackerBox,
    notifications: NotificationQueue,
}

impl ProvisioningOrchestrator {
    /// Creates a new `ProvisioningOrchestrator`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The immutable reference dataset.
    /// * `gateway` - The token-management gateway.
    /// * `tracker` - Where completed requests are recorded for status lookups.
    /// * `notifications` - Queue receiving completion events.
    pub fn new(
        catalog: Arc<ReferenceCatalog>,
        gateway: TokenGatewayRef,
        tracker: RequestTrackerBox,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            catalog,
            gateway,
            tracker,
            notifications,
        }
    }

    /// Provisions tokens for every requested merchant.
    ///
    /// Unknown merchant ids fail the whole request before the gateway is
    /// contacted. Per-merchant failures reported by the gateway are surfaced
    /// as-is, never retried.
    #[instrument(
        skip(self, request),
        fields(card = %request.card_identifier, merchants = request.merchant_app_ids.len())
    )]
    pub async fn provision(&self, request: ProvisioningRequest) -> Result<ProvisioningResponse> {
        if request.merchant_app_ids.is_empty() {
            return Err(ProvisioningError::InvalidRequest(
                "at least one merchant app id is required".to_string(),
            ));
        }
        if request.card_identifier.trim().is_empty() {
            return Err(ProvisioningError::InvalidRequest(
                "card identifier must not be blank".to_string(),
            ));
        }

        let unknown: Vec<i64> = request
            .merchant_app_ids
            .iter()
            .copied()
            .filter(|id| {
                u32::try_from(*id)
                    .ok()
                    .and_then(|id| self.catalog.find_merchant_by_id(id))
                    .is_none()
            })
            .collect();
        if !unknown.is_empty() {
            warn!(?unknown, "rejecting provisioning request with unknown merchant ids");
            return Err(ProvisioningError::InvalidMerchantIds(unknown));
        }

        // Catalog order, not request order.
        let selected: Vec<&MerchantApp> = self
            .catalog
            .all_merchants()
            .iter()
            .filter(|m| request.merchant_app_ids.contains(&i64::from(m.id)))
            .collect();
        let merchant_names: Vec<String> = selected.iter().map(|m| m.name.clone()).collect();
        info!(
            ?merchant_names,
            card_number = %self.catalog.card_profile().masked_number(),
            "starting push provisioning"
        );

        let raw = self
            .gateway
            .create_tokens(CreateTokensRequest {
                card_identifier: request.card_identifier.clone(),
                card: self.catalog.card_profile().clone(),
                merchant_names,
            })
            .await
            .inspect_err(|e| error!(error = %e, "push provisioning failed"))?;

        let response = normalize_response(&raw, &selected)
            .inspect_err(|e| error!(error = %e, "push provisioning failed"))?;

        if let Err(e) = self
            .tracker
            .record(ProvisioningStatusSnapshot::from(&response))
            .await
        {
            error!(request_id = %response.request_id, error = %e, "failed to record provisioning status");
        }

        info!(
            request_id = %response.request_id,
            status = %response.overall_status,
            tokens = response.results.len(),
            "push provisioning completed"
        );

        self.notifications.submit(ProvisioningCompleted {
            request_id: response.request_id.clone(),
            merchant_count: response.results.len(),
            completed_at: Utc::now(),
        });

        Ok(response)
    }

    /// Looks up the tracked status of a previously submitted request.
    #[instrument(skip(self))]
    pub async fn get_status(&self, request_id: &str) -> Result<ProvisioningStatusSnapshot> {
        self.tracker
            .get(request_id)
            .await?
            .ok_or_else(|| ProvisioningError::RequestNotFound(request_id.to_string()))
    }

    /// Merchant apps eligible for push provisioning.
    pub fn merchants(&self) -> MerchantDirectory {
        let merchants = self.catalog.all_merchants().to_vec();
        MerchantDirectory {
            total_count: merchants.len(),
            merchants,
            response_timestamp: Utc::now(),
        }
    }
}

/// Turns the gateway's raw answer into a `ProvisioningResponse`.
///
/// Every result must belong to one of the requested merchants and carry a
/// token reference id unique within the response.
fn normalize_response(
    raw: &GatewayProvisioningResponse,
    selected: &[&MerchantApp],
) -> Result<ProvisioningResponse> {
    let header = raw.header(CREATE_TOKENS)?;
    let entries = raw.push_provisioning_results.as_deref().ok_or_else(|| {
        ProvisioningError::malformed(CREATE_TOKENS, "missing field `pushProvisioningResults`")
    })?;

    let mut seen = HashSet::new();
    let results = entries
        .iter()
        .map(|entry| {
            let result = entry.normalize(CREATE_TOKENS)?;
            if !selected
                .iter()
                .any(|m| m.external_merchant_id == result.merchant_id)
            {
                return Err(ProvisioningError::malformed(
                    CREATE_TOKENS,
                    format!("result for unrequested merchant {}", result.merchant_id),
                ));
            }
            if !seen.insert(result.token_reference_id.clone()) {
                return Err(ProvisioningError::malformed(
                    CREATE_TOKENS,
                    format!("duplicate token reference id {}", result.token_reference_id),
                ));
            }
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProvisioningResponse {
        request_id: header.request_id,
        overall_status: header.overall_status,
        timestamp: header.timestamp,
        results,
    })
}
