use crate::application::notifications::NotificationQueue;
use crate::application::orchestrator::ProvisioningOrchestrator;
use crate::application::registry::TokenRegistry;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::ports::{CompletionNotifierRef, RequestTrackerBox, TokenGatewayRef};
use crate::infrastructure::in_memory::{InMemoryRequestTracker, InMemoryTokenGateway};
use crate::infrastructure::logging_notifier::LoggingNotifier;
use crate::infrastructure::timeout::TimeoutGateway;
use crate::interfaces::http::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fully wired service graph.
///
/// Dropping `state` closes the notification queue; awaiting
/// `notifications` afterwards waits for queued events to be delivered.
pub struct Services {
    pub state: AppState,
    pub notifications: JoinHandle<()>,
}

impl Services {
    /// Wires the in-memory gateway behind a timeout and a logging completion
    /// sink. Must be called from within a tokio runtime.
    pub fn in_memory(catalog: ReferenceCatalog, gateway_timeout: Duration) -> Self {
        let catalog = Arc::new(catalog);
        let gateway: TokenGatewayRef = Arc::new(InMemoryTokenGateway::new(catalog.clone()));
        let gateway: TokenGatewayRef = Arc::new(TimeoutGateway::new(gateway, gateway_timeout));
        Self::with_adapters(
            catalog,
            gateway,
            Box::new(InMemoryRequestTracker::new()),
            Arc::new(LoggingNotifier),
        )
    }

    pub fn with_adapters(
        catalog: Arc<ReferenceCatalog>,
        gateway: TokenGatewayRef,
        tracker: RequestTrackerBox,
        notifier: CompletionNotifierRef,
    ) -> Self {
        let (queue, notifications) = NotificationQueue::spawn(notifier);
        let orchestrator =
            ProvisioningOrchestrator::new(catalog.clone(), gateway.clone(), tracker, queue);
        let registry = TokenRegistry::new(gateway);

        Self {
            state: AppState {
                catalog,
                orchestrator: Arc::new(orchestrator),
                registry: Arc::new(registry),
            },
            notifications,
        }
    }

    /// Drops every queue handle and waits for pending notifications.
    pub async fn shutdown(self) {
        drop(self.state);
        if let Err(e) = self.notifications.await {
            tracing::warn!(error = %e, "notification worker ended abnormally");
        }
    }
}
