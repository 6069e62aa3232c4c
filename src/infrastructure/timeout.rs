use crate::domain::gateway::{
    CreateTokensRequest, GatewayProvisioningResponse, GatewayTokenDeletion, GatewayTokenDetail,
    GatewayTokenList, GatewayTokenUpdate,
};
use crate::domain::ports::{TokenGateway, TokenGatewayRef};
use crate::error::{ProvisioningError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Wraps a gateway so that every call is bounded by `limit`.
///
/// An expired call is reported as `GatewayUnavailable` for the operation
/// that timed out.
pub struct TimeoutGateway {
    inner: TokenGatewayRef,
    limit: Duration,
}

impl TimeoutGateway {
    pub fn new(inner: TokenGatewayRef, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, limit_ms = self.limit.as_millis() as u64, "gateway call timed out");
                Err(ProvisioningError::unavailable(
                    operation,
                    format!("timed out after {} ms", self.limit.as_millis()),
                ))
            }
        }
    }
}

#[async_trait]
impl TokenGateway for TimeoutGateway {
    async fn create_tokens(
        &self,
        request: CreateTokensRequest,
    ) -> Result<GatewayProvisioningResponse> {
        self.bounded("create_tokens", self.inner.create_tokens(request))
            .await
    }

    async fn list_tokens(&self, card_identifier: &str) -> Result<GatewayTokenList> {
        self.bounded("list_tokens", self.inner.list_tokens(card_identifier))
            .await
    }

    async fn get_token(&self, token_reference_id: &str) -> Result<Option<GatewayTokenDetail>> {
        self.bounded("get_token", self.inner.get_token(token_reference_id))
            .await
    }

    async fn update_token(
        &self,
        token_reference_id: &str,
        status: &str,
    ) -> Result<Option<GatewayTokenUpdate>> {
        self.bounded(
            "update_token",
            self.inner.update_token(token_reference_id, status),
        )
        .await
    }

    async fn delete_token(
        &self,
        token_reference_id: &str,
    ) -> Result<Option<GatewayTokenDeletion>> {
        self.bounded("delete_token", self.inner.delete_token(token_reference_id))
            .await
    }
}
