use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Countered,
    Accepted,
    Rejected,
}

/// Which party made an offer. The proposer is the non-host participant
/// who opened the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferSide {
    Host,
    Proposer,
}

impl OfferSide {
    pub fn other(self) -> OfferSide {
        match self {
            OfferSide::Host => OfferSide::Proposer,
            OfferSide::Proposer => OfferSide::Host,
        }
    }
}

/// One offered meeting time in a negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub timezone: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub proposed_by: OfferSide,
    pub proposed_at: DateTime<Utc>,
}

/// A non-host participant's offer to join a waiting match.
/// One DynamoDB item per proposal, partitioned by `match_id` with
/// `proposal_id` as the sort key, so a match's proposals are one query.
///
/// `counter_offer` holds the single currently-active counter; every offer
/// it superseded sits in `offer_history` in chronological order. History
/// entries are never reordered or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub match_id: String,
    pub proposal_id: String,
    pub proposer_id: String,
    pub proposer_display_name: String,
    pub timezone: String,
    pub date: DateTime<Utc>,
    pub contact_method: String,
    pub contact_info: String,
    pub notes: Option<String>,
    pub status: ProposalStatus,
    pub counter_offer: Option<Offer>,
    pub offer_history: Vec<Offer>,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_id: &str,
        proposer_id: &str,
        proposer_display_name: &str,
        timezone: &str,
        date: DateTime<Utc>,
        contact_method: &str,
        contact_info: &str,
        notes: Option<String>,
    ) -> Self {
        Proposal {
            match_id: match_id.to_string(),
            proposal_id: Uuid::new_v4().to_string(),
            proposer_id: proposer_id.to_string(),
            proposer_display_name: proposer_display_name.to_string(),
            timezone: timezone.to_string(),
            date,
            contact_method: contact_method.to_string(),
            contact_info: contact_info.to_string(),
            notes,
            status: ProposalStatus::Pending,
            counter_offer: None,
            offer_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The offer currently on the table: the latest counter if one exists,
    /// otherwise the proposal's initial offer.
    pub fn active_offer(&self) -> Offer {
        match &self.counter_offer {
            Some(counter) => counter.clone(),
            None => Offer {
                timezone: self.timezone.clone(),
                date: self.date,
                notes: self.notes.clone(),
                proposed_by: OfferSide::Proposer,
                proposed_at: self.created_at,
            },
        }
    }

    pub fn last_offered_by(&self) -> OfferSide {
        self.counter_offer
            .as_ref()
            .map(|offer| offer.proposed_by)
            .unwrap_or(OfferSide::Proposer)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Accepted | ProposalStatus::Rejected
        )
    }

    /// Replace the active offer with `offer`, archiving the one it
    /// supersedes. The archived entry is exactly the offer that was active
    /// immediately before the swap.
    pub fn apply_counter(&mut self, offer: Offer) {
        let superseded = self.active_offer();
        self.offer_history.push(superseded);
        self.counter_offer = Some(offer);
        self.status = ProposalStatus::Countered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(
            "match-1",
            "proposer-1",
            "Dana",
            "America/New_York",
            Utc::now(),
            "email",
            "dana@example.com",
            Some("evenings preferred".to_string()),
        )
    }

    fn offer_by(side: OfferSide) -> Offer {
        Offer {
            timezone: "Europe/Berlin".to_string(),
            date: Utc::now(),
            notes: None,
            proposed_by: side,
            proposed_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_proposal_is_pending() {
        let p = proposal();

        assert!(!p.proposal_id.is_empty());
        assert_eq!(p.status, ProposalStatus::Pending);
        assert!(p.counter_offer.is_none());
        assert!(p.offer_history.is_empty());
        assert!(!p.is_terminal());
    }

    #[test]
    fn test_active_offer_defaults_to_initial_offer() {
        let p = proposal();
        let active = p.active_offer();

        assert_eq!(active.timezone, p.timezone);
        assert_eq!(active.date, p.date);
        assert_eq!(active.proposed_by, OfferSide::Proposer);
        assert_eq!(p.last_offered_by(), OfferSide::Proposer);
    }

    #[test]
    fn test_apply_counter_archives_previous_offer() {
        let mut p = proposal();
        let initial = p.active_offer();

        let host_counter = offer_by(OfferSide::Host);
        p.apply_counter(host_counter.clone());

        assert_eq!(p.status, ProposalStatus::Countered);
        assert_eq!(p.last_offered_by(), OfferSide::Host);
        assert_eq!(p.offer_history.len(), 1);
        assert_eq!(p.offer_history[0], initial);
        assert_eq!(p.active_offer(), host_counter);
    }

    #[test]
    fn test_counter_history_stays_in_supersession_order() {
        let mut p = proposal();

        let first = offer_by(OfferSide::Host);
        let second = offer_by(OfferSide::Proposer);
        let third = offer_by(OfferSide::Host);

        p.apply_counter(first.clone());
        p.apply_counter(second.clone());
        p.apply_counter(third.clone());

        assert_eq!(p.offer_history.len(), 3);
        assert_eq!(p.offer_history[0].proposed_by, OfferSide::Proposer);
        assert_eq!(p.offer_history[1], first);
        assert_eq!(p.offer_history[2], second);
        assert_eq!(p.active_offer(), third);
    }

    #[test]
    fn test_terminal_statuses() {
        let mut p = proposal();

        p.status = ProposalStatus::Accepted;
        assert!(p.is_terminal());

        p.status = ProposalStatus::Rejected;
        assert!(p.is_terminal());

        p.status = ProposalStatus::Countered;
        assert!(!p.is_terminal());
    }

    #[test]
    fn test_proposal_serialization_round_trip() {
        let mut p = proposal();
        p.apply_counter(offer_by(OfferSide::Host));

        let serialized = serde_json::to_string(&p).unwrap();
        let deserialized: Proposal = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.proposal_id, p.proposal_id);
        assert_eq!(deserialized.status, ProposalStatus::Countered);
        assert_eq!(deserialized.offer_history.len(), 1);
        assert_eq!(deserialized.last_offered_by(), OfferSide::Host);
    }
}
