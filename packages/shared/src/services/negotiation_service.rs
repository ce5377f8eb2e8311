use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::models::debate_match::{DebateFormat, DebateMatch, MatchStatus};
use crate::models::notification::{NotificationEvent, NotificationKind};
use crate::models::proposal::{Offer, OfferSide, Proposal, ProposalStatus};
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::errors::proposal_repository_errors::ProposalRepositoryError;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::player_repository::PlayerRepository;
use crate::repositories::proposal_repository::ProposalRepository;
use crate::services::errors::negotiation_service_errors::NegotiationServiceError;
use crate::services::notification_service::NotificationSink;

/// An initial offer to join a waiting match.
#[derive(Debug, Clone)]
pub struct OfferRequest {
    pub timezone: String,
    pub date: DateTime<Utc>,
    pub contact_method: String,
    pub contact_info: String,
    pub notes: Option<String>,
}

/// A counter to the currently-active offer.
#[derive(Debug, Clone)]
pub struct CounterOfferRequest {
    pub timezone: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct NegotiationService {
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    proposal_repository: Arc<dyn ProposalRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    notifications: Arc<dyn NotificationSink>,
}

impl NegotiationService {
    pub fn new(
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        proposal_repository: Arc<dyn ProposalRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        NegotiationService {
            match_repository,
            proposal_repository,
            player_repository,
            notifications,
        }
    }

    /// Open a new match for proposals.
    pub async fn create_match(
        &self,
        host_id: &str,
        format: DebateFormat,
        time_control: &str,
        difficulty: &str,
    ) -> Result<DebateMatch, NegotiationServiceError> {
        self.require_player(host_id).await?;

        let debate_match = DebateMatch::new(host_id, format, time_control, difficulty);
        self.match_repository.create_match(&debate_match).await?;

        info!(
            "Match {} created by host {} ({:?})",
            debate_match.match_id, host_id, format
        );
        Ok(debate_match)
    }

    /// Submit an initial offer to a waiting match.
    pub async fn submit_proposal(
        &self,
        match_id: &str,
        proposer_id: &str,
        offer: OfferRequest,
    ) -> Result<Proposal, NegotiationServiceError> {
        let debate_match = self.require_match(match_id).await?;

        if debate_match.status != MatchStatus::Waiting {
            return Err(NegotiationServiceError::InvalidMatchState(format!(
                "match {} is not open for proposals",
                match_id
            )));
        }
        if proposer_id == debate_match.host_id {
            return Err(NegotiationServiceError::SelfProposal);
        }

        let proposer = match self.player_repository.get_player(proposer_id).await {
            Ok(player) => player,
            Err(PlayerRepositoryError::NotFound) => {
                return Err(NegotiationServiceError::PlayerNotFound(
                    proposer_id.to_string(),
                ))
            }
            Err(e) => return Err(NegotiationServiceError::PlayerRepository(e)),
        };

        let existing = self
            .proposal_repository
            .list_proposals_for_match(match_id)
            .await?;
        if existing
            .iter()
            .any(|p| p.proposer_id == proposer_id && !p.is_terminal())
        {
            return Err(NegotiationServiceError::DuplicateProposal);
        }

        let proposal = Proposal::new(
            match_id,
            proposer_id,
            &proposer.display_name,
            &offer.timezone,
            offer.date,
            &offer.contact_method,
            &offer.contact_info,
            offer.notes,
        );
        self.proposal_repository.create_proposal(&proposal).await?;

        info!(
            "Proposal {} submitted on match {} by {}",
            proposal.proposal_id, match_id, proposer_id
        );
        self.emit(NotificationEvent::new(
            match_id,
            NotificationKind::ProposalReceived,
            vec![debate_match.host_id.clone()],
            serde_json::json!({
                "proposal_id": proposal.proposal_id,
                "proposer_id": proposer_id,
                "proposer_display_name": proposal.proposer_display_name,
                "date": proposal.date,
                "timezone": proposal.timezone,
            }),
        ))
        .await;

        Ok(proposal)
    }

    /// Counter the currently-active offer. Only the party opposite the
    /// last offer may counter; the superseded offer is archived, never
    /// overwritten. Two racing counters resolve through the status guard:
    /// one commits, the other fails.
    pub async fn counter_propose(
        &self,
        match_id: &str,
        proposal_id: &str,
        actor_id: &str,
        counter: CounterOfferRequest,
    ) -> Result<Proposal, NegotiationServiceError> {
        let debate_match = self.require_match(match_id).await?;
        let proposal = self.require_proposal(match_id, proposal_id).await?;
        let side = actor_side(&debate_match, &proposal, actor_id)?;

        if proposal.is_terminal() {
            return Err(NegotiationServiceError::InvalidProposalState(format!(
                "proposal {} is closed",
                proposal_id
            )));
        }
        if proposal.last_offered_by() == side {
            return Err(NegotiationServiceError::InvalidProposalState(
                "the other party has not responded to the active offer".to_string(),
            ));
        }

        let expected_status = proposal.status;
        let mut updated = proposal.clone();
        updated.apply_counter(Offer {
            timezone: counter.timezone,
            date: counter.date,
            notes: counter.notes,
            proposed_by: side,
            proposed_at: Utc::now(),
        });

        match self
            .proposal_repository
            .update_proposal_if_status(&updated, expected_status)
            .await
        {
            Ok(()) => {}
            Err(ProposalRepositoryError::StateConflict) => {
                return Err(NegotiationServiceError::InvalidProposalState(
                    "proposal changed concurrently".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "Counter-offer recorded on proposal {} by {:?}",
            proposal_id, side
        );
        let recipient = match side {
            OfferSide::Host => updated.proposer_id.clone(),
            OfferSide::Proposer => debate_match.host_id.clone(),
        };
        self.emit(NotificationEvent::new(
            match_id,
            NotificationKind::CounterProposal,
            vec![recipient],
            serde_json::json!({
                "proposal_id": proposal_id,
                "countered_by": actor_id,
                "date": updated.active_offer().date,
                "timezone": updated.active_offer().timezone,
            }),
        ))
        .await;

        Ok(updated)
    }

    /// Accept the currently-active offer. Commits the accepted proposal,
    /// every sibling rejection, and the match transition to Ready in one
    /// transaction; a crash can never leave the match ready without an
    /// accepted proposal or the reverse.
    pub async fn accept_proposal(
        &self,
        match_id: &str,
        proposal_id: &str,
        actor_id: &str,
    ) -> Result<DebateMatch, NegotiationServiceError> {
        // On a lost transaction the state that beat us decides the real
        // error, so validation runs once more before giving up.
        for attempt in 0..2 {
            let debate_match = self.require_match(match_id).await?;
            if debate_match.status != MatchStatus::Waiting {
                return Err(NegotiationServiceError::InvalidMatchState(format!(
                    "match {} is no longer open",
                    match_id
                )));
            }

            let proposal = self.require_proposal(match_id, proposal_id).await?;
            let side = actor_side(&debate_match, &proposal, actor_id)?;

            if proposal.is_terminal() {
                return Err(NegotiationServiceError::InvalidProposalState(format!(
                    "proposal {} is closed",
                    proposal_id
                )));
            }
            if proposal.last_offered_by() == side {
                return Err(NegotiationServiceError::NotAuthorized);
            }

            let active = proposal.active_offer();

            let mut accepted = proposal.clone();
            accepted.status = ProposalStatus::Accepted;

            let siblings: Vec<Proposal> = self
                .proposal_repository
                .list_proposals_for_match(match_id)
                .await?
                .into_iter()
                .filter(|p| p.proposal_id != proposal_id && !p.is_terminal())
                .map(|mut p| {
                    p.status = ProposalStatus::Rejected;
                    p
                })
                .collect();

            let mut updated_match = debate_match.clone();
            updated_match.opponent_id = Some(proposal.proposer_id.clone());
            updated_match.status = MatchStatus::Ready;
            updated_match.scheduled_time = Some(active.date);
            updated_match.scheduled_timezone = Some(active.timezone.clone());
            updated_match.accepted_proposal_id = Some(proposal.proposal_id.clone());

            match self
                .proposal_repository
                .commit_acceptance(&accepted, proposal.status, &siblings, &updated_match)
                .await
            {
                Ok(()) => {
                    info!(
                        "Proposal {} accepted on match {}; {} sibling(s) rejected",
                        proposal_id,
                        match_id,
                        siblings.len()
                    );
                    self.emit(NotificationEvent::new(
                        match_id,
                        NotificationKind::Accepted,
                        vec![
                            updated_match.host_id.clone(),
                            proposal.proposer_id.clone(),
                        ],
                        serde_json::json!({
                            "proposal_id": proposal_id,
                            "scheduled_time": updated_match.scheduled_time,
                            "scheduled_timezone": updated_match.scheduled_timezone,
                        }),
                    ))
                    .await;
                    return Ok(updated_match);
                }
                Err(ProposalRepositoryError::TransactionConflict) if attempt == 0 => {
                    warn!(
                        "Acceptance of proposal {} lost a condition check; re-validating",
                        proposal_id
                    );
                }
                Err(ProposalRepositoryError::TransactionConflict) => {
                    return Err(NegotiationServiceError::InvalidProposalState(
                        "negotiation changed concurrently".to_string(),
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }

        unreachable!("acceptance loop always returns")
    }

    /// Reject the proposal outright. Terminal; only the party opposite
    /// the last offer may reject.
    pub async fn reject_proposal(
        &self,
        match_id: &str,
        proposal_id: &str,
        actor_id: &str,
    ) -> Result<Proposal, NegotiationServiceError> {
        let debate_match = self.require_match(match_id).await?;
        let proposal = self.require_proposal(match_id, proposal_id).await?;
        let side = actor_side(&debate_match, &proposal, actor_id)?;

        if proposal.is_terminal() {
            return Err(NegotiationServiceError::InvalidProposalState(format!(
                "proposal {} is closed",
                proposal_id
            )));
        }
        if proposal.last_offered_by() == side {
            return Err(NegotiationServiceError::NotAuthorized);
        }

        let expected_status = proposal.status;
        let mut updated = proposal.clone();
        updated.status = ProposalStatus::Rejected;

        match self
            .proposal_repository
            .update_proposal_if_status(&updated, expected_status)
            .await
        {
            Ok(()) => {}
            Err(ProposalRepositoryError::StateConflict) => {
                return Err(NegotiationServiceError::InvalidProposalState(
                    "proposal changed concurrently".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Proposal {} rejected by {}", proposal_id, actor_id);
        Ok(updated)
    }

    async fn require_match(&self, match_id: &str) -> Result<DebateMatch, NegotiationServiceError> {
        self.match_repository
            .get_match(match_id)
            .await?
            .ok_or(NegotiationServiceError::MatchNotFound)
    }

    async fn require_proposal(
        &self,
        match_id: &str,
        proposal_id: &str,
    ) -> Result<Proposal, NegotiationServiceError> {
        self.proposal_repository
            .get_proposal(match_id, proposal_id)
            .await?
            .ok_or(NegotiationServiceError::ProposalNotFound)
    }

    async fn require_player(&self, player_id: &str) -> Result<(), NegotiationServiceError> {
        match self.player_repository.get_player(player_id).await {
            Ok(_) => Ok(()),
            Err(PlayerRepositoryError::NotFound) => Err(NegotiationServiceError::PlayerNotFound(
                player_id.to_string(),
            )),
            Err(e) => Err(NegotiationServiceError::PlayerRepository(e)),
        }
    }

    async fn emit(&self, event: NotificationEvent) {
        if let Err(e) = self.notifications.publish(event).await {
            warn!("Notification publish failed (state change stands): {}", e);
        }
    }
}

/// Which side of the negotiation the actor is on. Anyone else has no
/// business touching the proposal.
fn actor_side(
    debate_match: &DebateMatch,
    proposal: &Proposal,
    actor_id: &str,
) -> Result<OfferSide, NegotiationServiceError> {
    if actor_id == debate_match.host_id {
        Ok(OfferSide::Host)
    } else if actor_id == proposal.proposer_id {
        Ok(OfferSide::Proposer)
    } else {
        Err(NegotiationServiceError::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::match_repository::tests::InMemoryMatchRepository;
    use crate::repositories::player_repository::tests::InMemoryPlayerRepository;
    use crate::repositories::proposal_repository::tests::InMemoryProposalRepository;
    use crate::services::notification_service::tests::{FailingSink, RecordingSink};

    struct Fixture {
        service: NegotiationService,
        match_repository: InMemoryMatchRepository,
        proposal_repository: InMemoryProposalRepository,
        sink: Arc<RecordingSink>,
        match_id: String,
    }

    const HOST: &str = "host-1";
    const PROPOSER: &str = "proposer-1";

    async fn fixture() -> Fixture {
        let match_repository = InMemoryMatchRepository::new();
        let proposal_repository =
            InMemoryProposalRepository::new(match_repository.matches.clone());
        let players = InMemoryPlayerRepository::new();
        players.insert_with_id(HOST, "Harper");
        players.insert_with_id(PROPOSER, "Dana");
        players.insert_with_id("proposer-2", "Evan");
        let sink = Arc::new(RecordingSink::new());

        let service = NegotiationService::new(
            Arc::new(match_repository.clone()),
            Arc::new(proposal_repository.clone()),
            Arc::new(players),
            sink.clone(),
        );

        let debate_match = service
            .create_match(HOST, DebateFormat::LincolnDouglas, "standard", "open")
            .await
            .unwrap();

        Fixture {
            service,
            match_repository,
            proposal_repository,
            sink,
            match_id: debate_match.match_id,
        }
    }

    fn offer() -> OfferRequest {
        OfferRequest {
            timezone: "America/New_York".to_string(),
            date: Utc::now(),
            contact_method: "email".to_string(),
            contact_info: "dana@example.com".to_string(),
            notes: None,
        }
    }

    fn counter() -> CounterOfferRequest {
        CounterOfferRequest {
            timezone: "Europe/Berlin".to_string(),
            date: Utc::now(),
            notes: Some("an hour later works better".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_proposal_happy_path() {
        let f = fixture().await;

        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();

        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.proposer_display_name, "Dana");
        assert_eq!(
            f.sink.kinds(),
            vec![NotificationKind::ProposalReceived]
        );
        let event = &f.sink.events.lock().unwrap()[0];
        assert_eq!(event.recipients, vec![HOST.to_string()]);
    }

    #[tokio::test]
    async fn test_second_open_proposal_by_same_proposer_is_duplicate() {
        let f = fixture().await;
        f.service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();

        let result = f.service.submit_proposal(&f.match_id, PROPOSER, offer()).await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::DuplicateProposal)
        ));
    }

    #[tokio::test]
    async fn test_resubmission_allowed_after_rejection() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        f.service
            .reject_proposal(&f.match_id, &proposal.proposal_id, HOST)
            .await
            .unwrap();

        let second = f.service.submit_proposal(&f.match_id, PROPOSER, offer()).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_host_cannot_propose_on_own_match() {
        let f = fixture().await;

        let result = f.service.submit_proposal(&f.match_id, HOST, offer()).await;

        assert!(matches!(result, Err(NegotiationServiceError::SelfProposal)));
    }

    #[tokio::test]
    async fn test_unknown_proposer_is_player_not_found() {
        let f = fixture().await;

        let result = f.service.submit_proposal(&f.match_id, "ghost", offer()).await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::PlayerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_on_missing_match() {
        let f = fixture().await;

        let result = f.service.submit_proposal("nope", PROPOSER, offer()).await;

        assert!(matches!(result, Err(NegotiationServiceError::MatchNotFound)));
    }

    #[tokio::test]
    async fn test_submit_on_non_waiting_match() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        f.service
            .accept_proposal(&f.match_id, &proposal.proposal_id, HOST)
            .await
            .unwrap();

        let result = f
            .service
            .submit_proposal(&f.match_id, "proposer-2", offer())
            .await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::InvalidMatchState(_))
        ));
    }

    #[tokio::test]
    async fn test_counter_alternation_is_enforced() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let id = proposal.proposal_id.clone();

        // host answers the initial offer, proposer answers back, host
        // answers again -- strict alternation so far
        f.service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await
            .unwrap();
        f.service
            .counter_propose(&f.match_id, &id, PROPOSER, counter())
            .await
            .unwrap();
        f.service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await
            .unwrap();

        // a second host counter before the proposer responds is refused
        let result = f
            .service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::InvalidProposalState(_))
        ));
    }

    #[tokio::test]
    async fn test_proposer_cannot_counter_own_pending_offer() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();

        let result = f
            .service
            .counter_propose(&f.match_id, &proposal.proposal_id, PROPOSER, counter())
            .await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::InvalidProposalState(_))
        ));
    }

    #[tokio::test]
    async fn test_outsider_cannot_counter() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();

        let result = f
            .service
            .counter_propose(&f.match_id, &proposal.proposal_id, "proposer-2", counter())
            .await;

        assert!(matches!(result, Err(NegotiationServiceError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_counter_history_archives_every_superseded_offer() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let id = proposal.proposal_id.clone();
        let initial = proposal.active_offer();

        let after_host = f
            .service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await
            .unwrap();
        let host_offer = after_host.active_offer();

        let after_proposer = f
            .service
            .counter_propose(&f.match_id, &id, PROPOSER, counter())
            .await
            .unwrap();

        assert_eq!(after_proposer.offer_history.len(), 2);
        assert_eq!(after_proposer.offer_history[0], initial);
        assert_eq!(after_proposer.offer_history[1], host_offer);
        assert_eq!(after_proposer.status, ProposalStatus::Countered);
        assert_eq!(f.sink.kinds().len(), 3); // received + two counters
    }

    #[tokio::test]
    async fn test_accept_transitions_match_and_rejects_siblings() {
        let f = fixture().await;
        let first = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let second = f
            .service
            .submit_proposal(&f.match_id, "proposer-2", offer())
            .await
            .unwrap();

        let updated = f
            .service
            .accept_proposal(&f.match_id, &first.proposal_id, HOST)
            .await
            .unwrap();

        assert_eq!(updated.status, MatchStatus::Ready);
        assert_eq!(updated.opponent_id, Some(PROPOSER.to_string()));
        assert_eq!(updated.accepted_proposal_id, Some(first.proposal_id.clone()));
        assert_eq!(updated.scheduled_time, Some(first.date));
        assert_eq!(updated.scheduled_timezone, Some(first.timezone.clone()));

        // exactly one accepted proposal, everything else rejected
        let proposals = f
            .proposal_repository
            .list_proposals_for_match(&f.match_id)
            .await
            .unwrap();
        let accepted: Vec<_> = proposals
            .iter()
            .filter(|p| p.status == ProposalStatus::Accepted)
            .collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].proposal_id, first.proposal_id);
        assert!(proposals
            .iter()
            .filter(|p| p.proposal_id != first.proposal_id)
            .all(|p| p.status == ProposalStatus::Rejected));
        assert_eq!(
            proposals
                .iter()
                .find(|p| p.proposal_id == second.proposal_id)
                .unwrap()
                .status,
            ProposalStatus::Rejected
        );

        let stored = f
            .match_repository
            .get_match(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MatchStatus::Ready);
    }

    #[tokio::test]
    async fn test_accept_after_host_counter_belongs_to_proposer() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let id = proposal.proposal_id.clone();
        let countered = f
            .service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await
            .unwrap();

        // the host made the active offer, so the host cannot accept it
        let by_host = f.service.accept_proposal(&f.match_id, &id, HOST).await;
        assert!(matches!(
            by_host,
            Err(NegotiationServiceError::NotAuthorized)
        ));

        let updated = f
            .service
            .accept_proposal(&f.match_id, &id, PROPOSER)
            .await
            .unwrap();

        // the schedule comes from the host's counter, not the initial offer
        assert_eq!(updated.scheduled_time, Some(countered.active_offer().date));
        assert_eq!(
            updated.scheduled_timezone,
            Some(countered.active_offer().timezone)
        );
    }

    #[tokio::test]
    async fn test_accept_on_closed_match_is_invalid_state() {
        let f = fixture().await;
        let first = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let second = f
            .service
            .submit_proposal(&f.match_id, "proposer-2", offer())
            .await
            .unwrap();
        f.service
            .accept_proposal(&f.match_id, &first.proposal_id, HOST)
            .await
            .unwrap();

        let result = f
            .service
            .accept_proposal(&f.match_id, &second.proposal_id, HOST)
            .await;

        assert!(matches!(
            result,
            Err(NegotiationServiceError::InvalidMatchState(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_is_terminal() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();
        let id = proposal.proposal_id.clone();

        let rejected = f
            .service
            .reject_proposal(&f.match_id, &id, HOST)
            .await
            .unwrap();
        assert_eq!(rejected.status, ProposalStatus::Rejected);

        let counter_after = f
            .service
            .counter_propose(&f.match_id, &id, HOST, counter())
            .await;
        assert!(matches!(
            counter_after,
            Err(NegotiationServiceError::InvalidProposalState(_))
        ));

        let accept_after = f.service.accept_proposal(&f.match_id, &id, HOST).await;
        assert!(matches!(
            accept_after,
            Err(NegotiationServiceError::InvalidProposalState(_))
        ));
    }

    #[tokio::test]
    async fn test_proposer_cannot_reject_own_pending_offer() {
        let f = fixture().await;
        let proposal = f
            .service
            .submit_proposal(&f.match_id, PROPOSER, offer())
            .await
            .unwrap();

        let result = f
            .service
            .reject_proposal(&f.match_id, &proposal.proposal_id, PROPOSER)
            .await;

        assert!(matches!(result, Err(NegotiationServiceError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_the_transition() {
        let match_repository = InMemoryMatchRepository::new();
        let proposal_repository =
            InMemoryProposalRepository::new(match_repository.matches.clone());
        let players = InMemoryPlayerRepository::new();
        players.insert_with_id(HOST, "Harper");
        players.insert_with_id(PROPOSER, "Dana");

        let service = NegotiationService::new(
            Arc::new(match_repository),
            Arc::new(proposal_repository.clone()),
            Arc::new(players),
            Arc::new(FailingSink),
        );

        let debate_match = service
            .create_match(HOST, DebateFormat::PublicForum, "standard", "open")
            .await
            .unwrap();
        let proposal = service
            .submit_proposal(&debate_match.match_id, PROPOSER, offer())
            .await
            .unwrap();

        // the write landed even though every publish failed
        let stored = proposal_repository
            .get_proposal(&debate_match.match_id, &proposal.proposal_id)
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
