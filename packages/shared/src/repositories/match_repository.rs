use crate::models::debate_match::{DebateMatch, MatchStatus};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("MATCHES_TABLE")
            .expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, debate_match: &DebateMatch) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str)
        -> Result<Option<DebateMatch>, MatchRepositoryError>;

    /// Write the full match document, guarded on the status the caller
    /// read. A concurrent transition fails the condition and surfaces
    /// `StateConflict` instead of silently overwriting.
    async fn update_match_if_status(
        &self,
        debate_match: &DebateMatch,
        expected: MatchStatus,
    ) -> Result<(), MatchRepositoryError>;
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, debate_match: &DebateMatch) -> Result<(), MatchRepositoryError> {
        let item = to_item(debate_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(match_id)")
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_match(
        &self,
        match_id: &str,
    ) -> Result<Option<DebateMatch>, MatchRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "match_id",
                to_attribute_value(match_id)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let debate_match: DebateMatch = from_item(item)
                .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(debate_match))
        } else {
            Ok(None)
        }
    }

    async fn update_match_if_status(
        &self,
        debate_match: &DebateMatch,
        expected: MatchStatus,
    ) -> Result<(), MatchRepositoryError> {
        let item = to_item(debate_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("#status = :expected")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":expected",
                to_attribute_value(expected)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(MatchRepositoryError::StateConflict);
                    }
                }
                Err(MatchRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }
}
