use crate::domain::ports::CompletionNotifierRef;
use crate::domain::provisioning::ProvisioningCompleted;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Detached queue for provisioning completion events.
///
/// Submitting never blocks and never fails from the caller's point of view.
/// A background worker forwards each event to the configured sink; sink
/// errors and panics are logged and otherwise dropped.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<ProvisioningCompleted>,
}

impl NotificationQueue {
    /// Starts the worker task. The returned handle completes once every clone
    /// of the queue has been dropped and the backlog is drained.
    pub fn spawn(sink: CompletionNotifierRef) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ProvisioningCompleted>();

        let worker = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let request_id = event.request_id.clone();
                let sink = sink.clone();
                match tokio::spawn(async move { sink.notify(event).await }).await {
                    Ok(Ok(())) => debug!(%request_id, "completion notification delivered"),
                    Ok(Err(e)) => {
                        warn!(%request_id, error = %e, "completion notification failed")
                    }
                    Err(e) => warn!(%request_id, error = %e, "completion notifier panicked"),
                }
            }
            debug!("notification queue drained");
        });

        (Self { sender }, worker)
    }

    pub fn submit(&self, event: ProvisioningCompleted) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            warn!(
                request_id = %event.request_id,
                "notification queue closed, dropping completion event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CompletionNotifier;
    use crate::error::{ProvisioningError, Result};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionNotifier for RecordingNotifier {
        async fn notify(&self, event: ProvisioningCompleted) -> Result<()> {
            if event.request_id == "boom" {
                panic!("sink exploded");
            }
            if event.request_id == "fail" {
                return Err(ProvisioningError::InternalError("sink down".into()));
            }
            self.events.lock().await.push(event.request_id);
            Ok(())
        }
    }

    fn event(request_id: &str) -> ProvisioningCompleted {
        ProvisioningCompleted {
            request_id: request_id.to_string(),
            merchant_count: 1,
            completed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_worker_survives_failing_and_panicking_sink() {
        let sink = Arc::new(RecordingNotifier::default());
        let (queue, worker) = NotificationQueue::spawn(sink.clone());

        queue.submit(event("a"));
        queue.submit(event("fail"));
        queue.submit(event("boom"));
        queue.submit(event("b"));
        drop(queue);

        worker.await.unwrap();
        assert_eq!(*sink.events.lock().await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_submit_after_worker_stopped_does_not_panic() {
        let sink = Arc::new(RecordingNotifier::default());
        let (queue, worker) = NotificationQueue::spawn(sink);
        worker.abort();
        let _ = worker.await;

        queue.submit(event("late"));
    }
}
