use crate::domain::ports::CompletionNotifier;
use crate::domain::provisioning::ProvisioningCompleted;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Default completion sink: records the event in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl CompletionNotifier for LoggingNotifier {
    async fn notify(&self, event: ProvisioningCompleted) -> Result<()> {
        info!(
            request_id = %event.request_id,
            tokens = event.merchant_count,
            completed_at = %event.completed_at,
            "push provisioning request completed"
        );
        Ok(())
    }
}
