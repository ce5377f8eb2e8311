use crate::models::rating::RatingRecord;
use crate::repositories::errors::rating_repository_errors::RatingRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

pub struct DynamoDbRatingRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbRatingRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("RATINGS_TABLE")
            .expect("RATINGS_TABLE environment variable must be set");
        Self { client, table_name }
    }

    /// Build the guarded write for one record. The record carries its
    /// post-update version; the guard is the version it was read at.
    /// Version 1 means the record was never persisted, so the guard is
    /// that no item exists yet (lazy first write).
    fn record_put(
        &self,
        record: &RatingRecord,
    ) -> Result<TransactWriteItem, RatingRepositoryError> {
        let item =
            to_item(record).map_err(|e| RatingRepositoryError::Serialization(e.to_string()))?;

        let mut put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item));

        if record.version <= 1 {
            put = put.condition_expression("attribute_not_exists(player_id)");
        } else {
            put = put
                .condition_expression("#version = :expected")
                .expression_attribute_names("#version", "version")
                .expression_attribute_values(
                    ":expected",
                    to_attribute_value(record.version - 1)
                        .map_err(|e| RatingRepositoryError::Serialization(e.to_string()))?,
                );
        }

        Ok(TransactWriteItem::builder()
            .put(
                put.build()
                    .map_err(|e| RatingRepositoryError::Transaction(e.to_string()))?,
            )
            .build())
    }
}

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn get_rating_record(
        &self,
        player_id: &str,
    ) -> Result<Option<RatingRecord>, RatingRepositoryError>;

    /// Commit both sides of a rating update in one transaction. Each
    /// record is version-guarded against the state it was read at; if
    /// either guard fails, neither record changes and `VersionConflict`
    /// tells the caller to re-read and recompute.
    async fn commit_rating_pair(
        &self,
        record_a: &RatingRecord,
        record_b: &RatingRecord,
    ) -> Result<(), RatingRepositoryError>;
}

#[async_trait]
impl RatingRepository for DynamoDbRatingRepository {
    async fn get_rating_record(
        &self,
        player_id: &str,
    ) -> Result<Option<RatingRecord>, RatingRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "player_id",
                to_attribute_value(player_id)
                    .map_err(|e| RatingRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| RatingRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let record: RatingRecord = from_item(item)
                .map_err(|e| RatingRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    async fn commit_rating_pair(
        &self,
        record_a: &RatingRecord,
        record_b: &RatingRecord,
    ) -> Result<(), RatingRepositoryError> {
        let transaction_items = vec![self.record_put(record_a)?, self.record_put(record_b)?];

        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(transaction_items))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if let TransactWriteItemsError::TransactionCanceledException(cancelled) =
                        service_err.err()
                    {
                        let condition_failed = cancelled
                            .cancellation_reasons()
                            .iter()
                            .any(|reason| reason.code() == Some("ConditionalCheckFailed"));
                        if condition_failed {
                            return Err(RatingRepositoryError::VersionConflict);
                        }
                    }
                }
                Err(RatingRepositoryError::Transaction(e.to_string()))
            }
        }
    }
}
