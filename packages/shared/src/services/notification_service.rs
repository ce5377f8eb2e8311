use std::sync::Arc;

use async_trait::async_trait;

use crate::models::notification::NotificationEvent;
use crate::repositories::errors::notification_repository_errors::NotificationRepositoryError;
use crate::repositories::notification_repository::NotificationRepository;

/// Where committed state transitions get announced. Implementations must
/// be safe to fail: engines log a publish error and move on, so a sink
/// can never roll back the transition it is reporting.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: NotificationEvent) -> Result<(), NotificationRepositoryError>;
}

/// Production sink: append the event to the outbox table and let the
/// match-notifier worker deliver it from the table's stream.
#[derive(Clone)]
pub struct OutboxNotificationSink {
    repository: Arc<dyn NotificationRepository + Send + Sync>,
}

impl OutboxNotificationSink {
    pub fn new(repository: Arc<dyn NotificationRepository + Send + Sync>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationSink for OutboxNotificationSink {
    async fn publish(&self, event: NotificationEvent) -> Result<(), NotificationRepositoryError> {
        self.repository.put_notification(&event).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test sink that records every published event.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<NotificationEvent>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn kinds(&self) -> Vec<crate::models::notification::NotificationKind> {
            self.events.lock().unwrap().iter().map(|e| e.kind).collect()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn publish(
            &self,
            event: NotificationEvent,
        ) -> Result<(), NotificationRepositoryError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    /// Test sink that always fails, for asserting transitions survive
    /// notification failures.
    pub struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn publish(
            &self,
            _event: NotificationEvent,
        ) -> Result<(), NotificationRepositoryError> {
            Err(NotificationRepositoryError::DynamoDb(
                "simulated outage".to_string(),
            ))
        }
    }
}
