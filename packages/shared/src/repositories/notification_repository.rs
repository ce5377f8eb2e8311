use crate::models::notification::NotificationEvent;
use crate::repositories::errors::notification_repository_errors::NotificationRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_item;

pub struct DynamoDbNotificationRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbNotificationRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("NOTIFICATIONS_TABLE")
            .expect("NOTIFICATIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append one event to the outbox. The table's stream is what actually
    /// delivers it; this write is fire-and-forget from the caller's view.
    async fn put_notification(
        &self,
        event: &NotificationEvent,
    ) -> Result<(), NotificationRepositoryError>;
}

#[async_trait]
impl NotificationRepository for DynamoDbNotificationRepository {
    async fn put_notification(
        &self,
        event: &NotificationEvent,
    ) -> Result<(), NotificationRepositoryError> {
        let item = to_item(event)
            .map_err(|e| NotificationRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| NotificationRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }
}
