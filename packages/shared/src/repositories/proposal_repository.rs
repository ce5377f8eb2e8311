use crate::models::debate_match::DebateMatch;
use crate::models::proposal::{Proposal, ProposalStatus};
use crate::repositories::errors::proposal_repository_errors::ProposalRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

pub struct DynamoDbProposalRepository {
    pub client: Client,
    pub proposals_table: String,
    pub matches_table: String,
}

impl DynamoDbProposalRepository {
    pub fn new(client: Client) -> Self {
        let proposals_table = std::env::var("PROPOSALS_TABLE")
            .expect("PROPOSALS_TABLE environment variable must be set");
        let matches_table = std::env::var("MATCHES_TABLE")
            .expect("MATCHES_TABLE environment variable must be set");
        Self {
            client,
            proposals_table,
            matches_table,
        }
    }

    fn proposal_put(
        &self,
        proposal: &Proposal,
        guard: Option<ProposalStatus>,
    ) -> Result<TransactWriteItem, ProposalRepositoryError> {
        let item = to_item(proposal)
            .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;

        let mut put = Put::builder()
            .table_name(&self.proposals_table)
            .set_item(Some(item));

        if let Some(expected) = guard {
            put = put
                .condition_expression("#status = :expected")
                .expression_attribute_names("#status", "status")
                .expression_attribute_values(
                    ":expected",
                    to_attribute_value(expected)
                        .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?,
                );
        }

        Ok(TransactWriteItem::builder()
            .put(
                put.build()
                    .map_err(|e| ProposalRepositoryError::Transaction(e.to_string()))?,
            )
            .build())
    }
}

#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn create_proposal(&self, proposal: &Proposal) -> Result<(), ProposalRepositoryError>;

    async fn get_proposal(
        &self,
        match_id: &str,
        proposal_id: &str,
    ) -> Result<Option<Proposal>, ProposalRepositoryError>;

    /// All proposals belonging to a match, in no particular order.
    async fn list_proposals_for_match(
        &self,
        match_id: &str,
    ) -> Result<Vec<Proposal>, ProposalRepositoryError>;

    /// Write the full proposal document, guarded on the status the caller
    /// read. If a concurrent writer changed the status first, the write
    /// fails with `StateConflict`; exactly one of two racing counters can
    /// succeed.
    async fn update_proposal_if_status(
        &self,
        proposal: &Proposal,
        expected: ProposalStatus,
    ) -> Result<(), ProposalRepositoryError>;

    /// Single atomic commit of an acceptance: the accepted proposal
    /// (guarded on its pre-acceptance status), every sibling rejection,
    /// and the match transition (guarded on Waiting). Either all documents
    /// change or none do.
    async fn commit_acceptance(
        &self,
        accepted: &Proposal,
        expected_status: ProposalStatus,
        rejected_siblings: &[Proposal],
        updated_match: &DebateMatch,
    ) -> Result<(), ProposalRepositoryError>;
}

#[async_trait]
impl ProposalRepository for DynamoDbProposalRepository {
    async fn create_proposal(&self, proposal: &Proposal) -> Result<(), ProposalRepositoryError> {
        let item = to_item(proposal)
            .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.proposals_table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(proposal_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(ProposalRepositoryError::AlreadyExists);
                    }
                }
                Err(ProposalRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_proposal(
        &self,
        match_id: &str,
        proposal_id: &str,
    ) -> Result<Option<Proposal>, ProposalRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.proposals_table)
            .key(
                "match_id",
                to_attribute_value(match_id)
                    .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?,
            )
            .key(
                "proposal_id",
                to_attribute_value(proposal_id)
                    .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ProposalRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let proposal: Proposal = from_item(item)
                .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(proposal))
        } else {
            Ok(None)
        }
    }

    async fn list_proposals_for_match(
        &self,
        match_id: &str,
    ) -> Result<Vec<Proposal>, ProposalRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.proposals_table)
            .key_condition_expression("match_id = :match_id")
            .expression_attribute_values(
                ":match_id",
                to_attribute_value(match_id)
                    .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ProposalRepositoryError::DynamoDb(e.to_string()))?;

        let mut proposals = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let proposal: Proposal = from_item(item)
                    .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;
                proposals.push(proposal);
            }
        }

        Ok(proposals)
    }

    async fn update_proposal_if_status(
        &self,
        proposal: &Proposal,
        expected: ProposalStatus,
    ) -> Result<(), ProposalRepositoryError> {
        let item = to_item(proposal)
            .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.proposals_table)
            .set_item(Some(item))
            .condition_expression("#status = :expected")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":expected",
                to_attribute_value(expected)
                    .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(ProposalRepositoryError::StateConflict);
                    }
                }
                Err(ProposalRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn commit_acceptance(
        &self,
        accepted: &Proposal,
        expected_status: ProposalStatus,
        rejected_siblings: &[Proposal],
        updated_match: &DebateMatch,
    ) -> Result<(), ProposalRepositoryError> {
        let mut transaction_items = vec![self.proposal_put(accepted, Some(expected_status))?];

        for sibling in rejected_siblings {
            transaction_items.push(self.proposal_put(sibling, None)?);
        }

        let match_item = to_item(updated_match)
            .map_err(|e| ProposalRepositoryError::Serialization(e.to_string()))?;
        transaction_items.push(
            TransactWriteItem::builder()
                .put(
                    Put::builder()
                        .table_name(&self.matches_table)
                        .set_item(Some(match_item))
                        .condition_expression("#status = :waiting")
                        .expression_attribute_names("#status", "status")
                        .expression_attribute_values(
                            ":waiting",
                            to_attribute_value(crate::models::debate_match::MatchStatus::Waiting)
                                .map_err(|e| {
                                    ProposalRepositoryError::Serialization(e.to_string())
                                })?,
                        )
                        .build()
                        .map_err(|e| ProposalRepositoryError::Transaction(e.to_string()))?,
                )
                .build(),
        );

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
                            return Err(ProposalRepositoryError::TransactionConflict);
                        }
                    }
                }
                Err(ProposalRepositoryError::Transaction(e.to_string()))
            }
        }
    }
}
