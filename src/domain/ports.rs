use super::gateway::{
    CreateTokensRequest, GatewayProvisioningResponse, GatewayTokenDeletion, GatewayTokenDetail,
    GatewayTokenList, GatewayTokenUpdate,
};
use super::provisioning::{ProvisioningCompleted, ProvisioningStatusSnapshot};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Capability contract of the external token-management gateway.
///
/// Lookups that address a single token return `Ok(None)` when the gateway
/// reports the token as unknown. Transport failures surface as
/// `ProvisioningError::GatewayUnavailable`.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    async fn create_tokens(&self, request: CreateTokensRequest)
    -> Result<GatewayProvisioningResponse>;
    async fn list_tokens(&self, card_identifier: &str) -> Result<GatewayTokenList>;
    async fn get_token(&self, token_reference_id: &str) -> Result<Option<GatewayTokenDetail>>;
    async fn update_token(
        &self,
        token_reference_id: &str,
        status: &str,
    ) -> Result<Option<GatewayTokenUpdate>>;
    async fn delete_token(&self, token_reference_id: &str)
    -> Result<Option<GatewayTokenDeletion>>;
}

/// Sink for provisioning completion events.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify(&self, event: ProvisioningCompleted) -> Result<()>;
}

/// Keeps track of submitted provisioning requests.
#[async_trait]
pub trait RequestTracker: Send + Sync {
    async fn record(&self, snapshot: ProvisioningStatusSnapshot) -> Result<()>;
    async fn get(&self, request_id: &str) -> Result<Option<ProvisioningStatusSnapshot>>;
}

pub type TokenGatewayRef = Arc<dyn TokenGateway>;
pub type CompletionNotifierRef = Arc<dyn CompletionNotifier>;
pub type RequestTrackerBox = Box<dyn RequestTracker>;
