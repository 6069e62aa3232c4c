#![allow(dead_code)]

use async_trait::async_trait;
use push_provisioning::bootstrap::Services;
use push_provisioning::domain::catalog::ReferenceCatalog;
use push_provisioning::domain::gateway::{
    CreateTokensRequest, GatewayProvisioningResponse, GatewayTokenDeletion, GatewayTokenDetail,
    GatewayTokenList, GatewayTokenUpdate,
};
use push_provisioning::domain::ports::{TokenGateway, TokenGatewayRef};
use push_provisioning::error::Result;
use push_provisioning::infrastructure::in_memory::{InMemoryRequestTracker, InMemoryTokenGateway};
use push_provisioning::infrastructure::logging_notifier::LoggingNotifier;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Delegates to an in-memory gateway and counts `create_tokens` calls.
#[derive(Clone)]
pub struct CountingGateway {
    inner: InMemoryTokenGateway,
    create_calls: Arc<AtomicUsize>,
}

impl CountingGateway {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self {
            inner: InMemoryTokenGateway::new(catalog),
            create_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenGateway for CountingGateway {
    async fn create_tokens(
        &self,
        request: CreateTokensRequest,
    ) -> Result<GatewayProvisioningResponse> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_tokens(request).await
    }

    async fn list_tokens(&self, card_identifier: &str) -> Result<GatewayTokenList> {
        self.inner.list_tokens(card_identifier).await
    }

    async fn get_token(&self, token_reference_id: &str) -> Result<Option<GatewayTokenDetail>> {
        self.inner.get_token(token_reference_id).await
    }

    async fn update_token(
        &self,
        token_reference_id: &str,
        status: &str,
    ) -> Result<Option<GatewayTokenUpdate>> {
        self.inner.update_token(token_reference_id, status).await
    }

    async fn delete_token(
        &self,
        token_reference_id: &str,
    ) -> Result<Option<GatewayTokenDeletion>> {
        self.inner.delete_token(token_reference_id).await
    }
}

/// Services over the built-in catalog and a plain in-memory gateway.
pub fn services() -> Services {
    Services::in_memory(ReferenceCatalog::default(), Duration::from_secs(5))
}

/// Services whose gateway counts provisioning calls.
pub fn counted_services() -> (Services, CountingGateway) {
    let catalog = Arc::new(ReferenceCatalog::default());
    let gateway = CountingGateway::new(catalog.clone());
    let shared: TokenGatewayRef = Arc::new(gateway.clone());
    let services = Services::with_adapters(
        catalog,
        shared,
        Box::new(InMemoryRequestTracker::new()),
        Arc::new(LoggingNotifier),
    );
    (services, gateway)
}

pub fn write_transactions_csv(path: &std::path::Path) -> std::io::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "id",
        "merchant",
        "amount",
        "date",
        "type",
        "status",
        "tokenUsed",
        "tokenReferenceId",
    ])?;
    wtr.write_record([
        "TXN_900", "Swiggy", "412.75", "2024-02-03", "food", "completed", "true", "TKN_SWIGGY_9",
    ])?;
    wtr.write_record([
        "TXN_901", "Playo", "150", "2024-02-04", "sports", "pending", "false", "",
    ])?;
    wtr.flush()?;
    Ok(())
}
