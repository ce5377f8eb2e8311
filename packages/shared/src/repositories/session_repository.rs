use crate::models::debate_session::DebateSession;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

pub struct DynamoDbSessionRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbSessionRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("SESSIONS_TABLE")
            .expect("SESSIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn put_session(&self, session: &DebateSession) -> Result<(), SessionRepositoryError>;

    async fn get_session(
        &self,
        match_id: &str,
    ) -> Result<Option<DebateSession>, SessionRepositoryError>;

    /// Write the session guarded on the version it was read at. The
    /// session carries the incremented version; `expected_version` is the
    /// one the caller read. A lost guard means another timer operation
    /// committed first.
    async fn update_session(
        &self,
        session: &DebateSession,
        expected_version: u64,
    ) -> Result<(), SessionRepositoryError>;

    async fn delete_session(&self, match_id: &str) -> Result<(), SessionRepositoryError>;

    /// Every session with a running phase or prep countdown. Drives the
    /// ticker's once-per-second pass.
    async fn list_running_sessions(&self) -> Result<Vec<DebateSession>, SessionRepositoryError>;
}

#[async_trait]
impl SessionRepository for DynamoDbSessionRepository {
    async fn put_session(&self, session: &DebateSession) -> Result<(), SessionRepositoryError> {
        let item =
            to_item(session).map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(match_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(SessionRepositoryError::AlreadyExists);
                    }
                }
                Err(SessionRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_session(
        &self,
        match_id: &str,
    ) -> Result<Option<DebateSession>, SessionRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "match_id",
                to_attribute_value(match_id)
                    .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let session: DebateSession = from_item(item)
                .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    async fn update_session(
        &self,
        session: &DebateSession,
        expected_version: u64,
    ) -> Result<(), SessionRepositoryError> {
        let item =
            to_item(session).map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("#version = :expected")
            .expression_attribute_names("#version", "version")
            .expression_attribute_values(
                ":expected",
                to_attribute_value(expected_version)
                    .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(SessionRepositoryError::VersionConflict);
                    }
                }
                Err(SessionRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn delete_session(&self, match_id: &str) -> Result<(), SessionRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                "match_id",
                to_attribute_value(match_id)
                    .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn list_running_sessions(&self) -> Result<Vec<DebateSession>, SessionRepositoryError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("is_active = :running OR prep_active = :running")
            .expression_attribute_values(":running", AttributeValue::Bool(true))
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        let mut sessions = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let session: DebateSession = from_item(item)
                    .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;
                sessions.push(session);
            }
        }

        Ok(sessions)
    }
}
