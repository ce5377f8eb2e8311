use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    ProposalReceived,
    CounterProposal,
    Accepted,
    RatingUpdated,
}

/// One fire-and-forget event emitted after a committed state transition.
/// Written to the notification outbox table; the match-notifier worker
/// fans the table's stream out to connected recipients. Delivery is
/// best-effort and never part of the committing transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub notification_id: String,
    pub match_id: String,
    pub kind: NotificationKind,
    pub recipients: Vec<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(
        match_id: &str,
        kind: NotificationKind,
        recipients: Vec<String>,
        payload: serde_json::Value,
    ) -> Self {
        NotificationEvent {
            notification_id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            kind,
            recipients,
            payload,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_round_trip() {
        let event = NotificationEvent::new(
            "match-1",
            NotificationKind::CounterProposal,
            vec!["host-1".to_string(), "proposer-1".to_string()],
            serde_json::json!({ "proposal_id": "p-1" }),
        );

        let serialized = serde_json::to_string(&event).unwrap();
        let deserialized: NotificationEvent = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.match_id, "match-1");
        assert_eq!(deserialized.kind, NotificationKind::CounterProposal);
        assert_eq!(deserialized.recipients.len(), 2);
        assert_eq!(deserialized.payload["proposal_id"], "p-1");
    }
}
