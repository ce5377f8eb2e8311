use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::Error;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;
use shared::models::judgment::Judgment;
use shared::services::debate_session_service::DebateSessionService;
use shared::services::errors::debate_session_service_errors::DebateSessionServiceError;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct JudgmentProcessor {
    session_service: DebateSessionService,
}

impl JudgmentProcessor {
    pub fn new(session_service: DebateSessionService) -> Self {
        Self { session_service }
    }

    pub async fn process_event(&self, event: Event) -> Result<(), Error> {
        debug!(
            "Judgment processor received event with {} records",
            event.records.len()
        );

        for record in event.records {
            let event_name = record.event_name.as_str();
            match event_name {
                "INSERT" => {
                    let new_image = record.change.new_image;
                    let judgment: Judgment = from_item(new_image.into())?;

                    info!(
                        "Judgment received for match {}: winner {:?}",
                        judgment.match_id, judgment.winner
                    );

                    match self
                        .session_service
                        .complete_match(&judgment.match_id, judgment.winner)
                        .await
                    {
                        Ok(completed) => {
                            info!(
                                "Match {} completed and ratings settled",
                                completed.match_id
                            );
                        }
                        // a replayed stream record finds the match already
                        // completed; nothing to redo
                        Err(DebateSessionServiceError::InvalidMatchState(msg)) => {
                            warn!(
                                "Skipping judgment for match {}: {}",
                                judgment.match_id, msg
                            );
                        }
                        Err(e) => {
                            error!("Failed to complete match {}: {}", judgment.match_id, e);
                        }
                    }
                }
                _ => {
                    warn!("Unhandled event type: {}", event_name);
                }
            }
        }

        Ok(())
    }
}
