use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::debate_match::{DebateMatch, MatchStatus, MatchWinner};
use crate::models::debate_session::DebateSession;
use crate::models::notification::{NotificationEvent, NotificationKind};
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::session_repository::SessionRepository;
use crate::services::errors::debate_session_service_errors::DebateSessionServiceError;
use crate::services::notification_service::NotificationSink;
use crate::services::rating_service::{MatchScore, RatingService};

/// Attempts for a version-guarded timer write before giving up. Timer
/// operations race at human speed; more than a couple of live writers on
/// one session means something is wrong.
const MAX_TIMER_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct DebateSessionService {
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    rating_service: RatingService,
    notifications: Arc<dyn NotificationSink>,
}

impl DebateSessionService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        rating_service: RatingService,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        DebateSessionService {
            session_repository,
            match_repository,
            rating_service,
            notifications,
        }
    }

    /// Take a scheduled match live: Ready -> Active, with a fresh session
    /// at the first phase, timer loaded but stopped. The status guard
    /// makes this exactly-once under concurrent starts.
    pub async fn start_session(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        let debate_match = self.require_match(match_id).await?;
        if debate_match.status != MatchStatus::Ready {
            return Err(DebateSessionServiceError::InvalidMatchState(format!(
                "match {} is not ready to start",
                match_id
            )));
        }

        let mut activated = debate_match.clone();
        activated.status = MatchStatus::Active;
        match self
            .match_repository
            .update_match_if_status(&activated, MatchStatus::Ready)
            .await
        {
            Ok(()) => {}
            Err(crate::repositories::errors::match_repository_errors::MatchRepositoryError::StateConflict) => {
                return Err(DebateSessionServiceError::InvalidMatchState(format!(
                    "match {} was started concurrently",
                    match_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let session = DebateSession::new(match_id, debate_match.format);
        self.session_repository.put_session(&session).await?;

        info!("Debate session started for match {}", match_id);
        Ok(session)
    }

    pub async fn start_phase_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            if session.time_remaining == 0 {
                session.time_remaining = session.settings().duration_of(session.current_phase);
            }
            session.is_active = true;
            true
        })
        .await
    }

    pub async fn pause_phase_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            let was_active = session.is_active;
            session.is_active = false;
            was_active
        })
        .await
    }

    /// Reload the current phase's full duration and stop the countdown.
    pub async fn reset_phase_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            session.time_remaining = session.settings().duration_of(session.current_phase);
            session.is_active = false;
            true
        })
        .await
    }

    pub async fn start_prep_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            if session.prep_time_remaining == 0 {
                session.prep_time_remaining = session.settings().prep_secs;
            }
            session.prep_active = true;
            true
        })
        .await
    }

    pub async fn pause_prep_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            let was_active = session.prep_active;
            session.prep_active = false;
            was_active
        })
        .await
    }

    pub async fn reset_prep_timer(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.mutate_session(match_id, |session| {
            session.prep_time_remaining = session.settings().prep_secs;
            session.prep_active = false;
            true
        })
        .await
    }

    /// Apply one second of wall clock to whichever countdowns are
    /// running. A tick against a missing session or one with no running
    /// timer is a no-op, so duplicate or late ticks are harmless. A phase
    /// countdown reaching zero advances the phase and stops the timer; at
    /// the terminal phase it flags the session as awaiting judgment.
    pub async fn tick(&self, match_id: &str) -> Result<(), DebateSessionServiceError> {
        for _ in 0..MAX_TIMER_ATTEMPTS {
            let session = self.session_repository.get_session(match_id).await?;
            let Some(mut session) = session else {
                return Ok(());
            };
            if !session.has_running_timer() {
                return Ok(());
            }

            let expected = session.version;
            apply_tick(&mut session);
            session.version += 1;
            session.updated_at = Utc::now();

            match self
                .session_repository
                .update_session(&session, expected)
                .await
            {
                Ok(()) => {
                    if session.awaiting_judgment {
                        debug!("Match {} finished its phases; awaiting judgment", match_id);
                    }
                    return Ok(());
                }
                // another timer operation landed first; re-read so the
                // tick still applies to the state that won
                Err(SessionRepositoryError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(DebateSessionServiceError::ConcurrencyConflict)
    }

    /// One ticker pass over every session with a running countdown.
    /// Per-session failures are logged and skipped so one bad session
    /// cannot stall the clock for everyone else.
    pub async fn tick_running_sessions(&self) -> Result<usize, DebateSessionServiceError> {
        let sessions = self.session_repository.list_running_sessions().await?;
        let count = sessions.len();

        for session in sessions {
            if let Err(e) = self.tick(&session.match_id).await {
                warn!("Tick failed for match {}: {}", session.match_id, e);
            }
        }

        Ok(count)
    }

    /// Move to the next phase, timer loaded and stopped. At the terminal
    /// phase there is nothing to advance into: the session is flagged as
    /// awaiting judgment and `AwaitingJudgment` is raised — recoverable,
    /// the match stays active until a judgment arrives.
    pub async fn advance_phase(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        for _ in 0..MAX_TIMER_ATTEMPTS {
            let mut session = self.require_session(match_id).await?;
            let expected = session.version;

            let Some(next) = session.current_phase.next() else {
                if !session.awaiting_judgment {
                    session.awaiting_judgment = true;
                    session.is_active = false;
                    session.version += 1;
                    session.updated_at = Utc::now();
                    match self
                        .session_repository
                        .update_session(&session, expected)
                        .await
                    {
                        Ok(()) | Err(SessionRepositoryError::VersionConflict) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                return Err(DebateSessionServiceError::AwaitingJudgment);
            };

            session.current_phase = next;
            session.time_remaining = session.settings().duration_of(next);
            session.is_active = false;
            session.version += 1;
            session.updated_at = Utc::now();

            match self
                .session_repository
                .update_session(&session, expected)
                .await
            {
                Ok(()) => {
                    info!("Match {} advanced to {:?}", match_id, next);
                    return Ok(session);
                }
                Err(SessionRepositoryError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(DebateSessionServiceError::ConcurrencyConflict)
    }

    /// Close out an active match with the externally judged winner, then
    /// settle both ratings. The Active -> Completed status guard is the
    /// exactly-once gate: a duplicate judgment finds the match already
    /// completed and cannot double-count the rating update.
    pub async fn complete_match(
        &self,
        match_id: &str,
        winner: MatchWinner,
    ) -> Result<DebateMatch, DebateSessionServiceError> {
        let debate_match = self.require_match(match_id).await?;
        if debate_match.status != MatchStatus::Active {
            return Err(DebateSessionServiceError::InvalidMatchState(format!(
                "match {} is not active",
                match_id
            )));
        }

        if let Some(session) = self.session_repository.get_session(match_id).await? {
            if !session.awaiting_judgment {
                return Err(DebateSessionServiceError::InvalidMatchState(format!(
                    "match {} has not finished its phases",
                    match_id
                )));
            }
        }

        let opponent_id = debate_match.opponent_id.clone().ok_or_else(|| {
            DebateSessionServiceError::InvalidMatchState(format!(
                "match {} has no opponent",
                match_id
            ))
        })?;

        let mut completed = debate_match.clone();
        completed.status = MatchStatus::Completed;
        completed.winner = Some(winner);

        match self
            .match_repository
            .update_match_if_status(&completed, MatchStatus::Active)
            .await
        {
            Ok(()) => {}
            Err(crate::repositories::errors::match_repository_errors::MatchRepositoryError::StateConflict) => {
                return Err(DebateSessionServiceError::InvalidMatchState(format!(
                    "match {} was completed concurrently",
                    match_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        self.session_repository.delete_session(match_id).await?;

        let host_score = match winner {
            MatchWinner::Host => MatchScore::Win,
            MatchWinner::Opponent => MatchScore::Loss,
        };
        let (host_change, opponent_change) = self
            .rating_service
            .update_ratings(&debate_match.host_id, &opponent_id, host_score, match_id)
            .await?;

        info!(
            "Match {} completed, winner {:?}: {} {:+}, {} {:+}",
            match_id,
            winner,
            debate_match.host_id,
            host_change.delta,
            opponent_id,
            opponent_change.delta
        );
        self.emit(NotificationEvent::new(
            match_id,
            NotificationKind::RatingUpdated,
            vec![debate_match.host_id.clone(), opponent_id.clone()],
            serde_json::json!({
                "winner": winner,
                "winner_player_id": completed.player_on_side(winner),
                "host": {
                    "player_id": debate_match.host_id,
                    "new_rating": host_change.new_rating,
                    "delta": host_change.delta,
                },
                "opponent": {
                    "player_id": opponent_id,
                    "new_rating": opponent_change.new_rating,
                    "delta": opponent_change.delta,
                },
            }),
        ))
        .await;

        Ok(completed)
    }

    async fn mutate_session<F>(
        &self,
        match_id: &str,
        mutate: F,
    ) -> Result<DebateSession, DebateSessionServiceError>
    where
        F: Fn(&mut DebateSession) -> bool,
    {
        for _ in 0..MAX_TIMER_ATTEMPTS {
            let mut session = self.require_session(match_id).await?;
            let expected = session.version;

            if !mutate(&mut session) {
                return Ok(session);
            }
            session.version += 1;
            session.updated_at = Utc::now();

            match self
                .session_repository
                .update_session(&session, expected)
                .await
            {
                Ok(()) => return Ok(session),
                Err(SessionRepositoryError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(DebateSessionServiceError::ConcurrencyConflict)
    }

    async fn require_match(
        &self,
        match_id: &str,
    ) -> Result<DebateMatch, DebateSessionServiceError> {
        self.match_repository
            .get_match(match_id)
            .await?
            .ok_or(DebateSessionServiceError::MatchNotFound)
    }

    async fn require_session(
        &self,
        match_id: &str,
    ) -> Result<DebateSession, DebateSessionServiceError> {
        self.session_repository
            .get_session(match_id)
            .await?
            .ok_or(DebateSessionServiceError::SessionNotFound)
    }

    async fn emit(&self, event: NotificationEvent) {
        if let Err(e) = self.notifications.publish(event).await {
            warn!("Notification publish failed (state change stands): {}", e);
        }
    }
}

/// One second of wall clock against whichever countdowns run.
fn apply_tick(session: &mut DebateSession) {
    if session.is_active {
        session.time_remaining = session.time_remaining.saturating_sub(1);
        if session.time_remaining == 0 {
            match session.current_phase.next() {
                Some(next) => {
                    session.current_phase = next;
                    session.time_remaining = session.settings().duration_of(next);
                }
                None => {
                    session.awaiting_judgment = true;
                }
            }
            session.is_active = false;
        }
    }
    if session.prep_active {
        session.prep_time_remaining = session.prep_time_remaining.saturating_sub(1);
        if session.prep_time_remaining == 0 {
            session.prep_active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::debate_match::DebateFormat;
    use crate::models::debate_session::DebatePhase;
    use crate::repositories::match_repository::tests::InMemoryMatchRepository;
    use crate::repositories::player_repository::tests::InMemoryPlayerRepository;
    use crate::repositories::rating_repository::tests::InMemoryRatingRepository;
    use crate::repositories::rating_repository::RatingRepository;
    use crate::repositories::session_repository::tests::InMemorySessionRepository;
    use crate::services::notification_service::tests::RecordingSink;

    const HOST: &str = "host-1";
    const OPPONENT: &str = "opp-1";

    struct Fixture {
        service: DebateSessionService,
        match_repository: InMemoryMatchRepository,
        session_repository: InMemorySessionRepository,
        ratings: InMemoryRatingRepository,
        sink: Arc<RecordingSink>,
        match_id: String,
    }

    /// A ready match between HOST and OPPONENT, session not yet started.
    async fn fixture() -> Fixture {
        let match_repository = InMemoryMatchRepository::new();
        let session_repository = InMemorySessionRepository::new();
        let ratings = InMemoryRatingRepository::new();
        let players = InMemoryPlayerRepository::new();
        players.insert_with_id(HOST, "Harper");
        players.insert_with_id(OPPONENT, "Dana");
        let sink = Arc::new(RecordingSink::new());

        let rating_service = RatingService::new(Arc::new(ratings.clone()), Arc::new(players));
        let service = DebateSessionService::new(
            Arc::new(session_repository.clone()),
            Arc::new(match_repository.clone()),
            rating_service,
            sink.clone(),
        );

        let mut debate_match =
            DebateMatch::new(HOST, DebateFormat::LincolnDouglas, "standard", "open");
        debate_match.opponent_id = Some(OPPONENT.to_string());
        debate_match.status = MatchStatus::Ready;
        let match_id = debate_match.match_id.clone();
        match_repository.insert(debate_match);

        Fixture {
            service,
            match_repository,
            session_repository,
            ratings,
            sink,
            match_id,
        }
    }

    fn patch_session<F: FnOnce(&mut DebateSession)>(f: &Fixture, patch: F) {
        let mut sessions = f.session_repository.sessions.lock().unwrap();
        let session = sessions.get_mut(&f.match_id).unwrap();
        patch(session);
        session.version += 1;
    }

    #[tokio::test]
    async fn test_start_session_activates_match() {
        let f = fixture().await;

        let session = f.service.start_session(&f.match_id).await.unwrap();

        assert_eq!(session.current_phase, DebatePhase::Speech1);
        assert_eq!(session.time_remaining, 360);
        assert!(!session.is_active);

        let stored = f
            .match_repository
            .get_match(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MatchStatus::Active);
    }

    #[tokio::test]
    async fn test_start_session_requires_ready_match() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();

        let again = f.service.start_session(&f.match_id).await;

        assert!(matches!(
            again,
            Err(DebateSessionServiceError::InvalidMatchState(_))
        ));
    }

    #[tokio::test]
    async fn test_tick_decrements_only_while_running() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();

        // stopped timer: tick is a no-op
        f.service.tick(&f.match_id).await.unwrap();
        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.time_remaining, 360);

        f.service.start_phase_timer(&f.match_id).await.unwrap();
        f.service.tick(&f.match_id).await.unwrap();
        f.service.tick(&f.match_id).await.unwrap();

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.time_remaining, 358);

        f.service.pause_phase_timer(&f.match_id).await.unwrap();
        f.service.tick(&f.match_id).await.unwrap();
        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.time_remaining, 358);
    }

    #[tokio::test]
    async fn test_tick_on_unknown_match_is_a_no_op() {
        let f = fixture().await;

        assert!(f.service.tick("no-such-match").await.is_ok());
    }

    #[tokio::test]
    async fn test_expiring_phase_auto_advances_and_stops() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        f.service.start_phase_timer(&f.match_id).await.unwrap();
        patch_session(&f, |s| s.time_remaining = 1);

        f.service.tick(&f.match_id).await.unwrap();

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.current_phase, DebatePhase::Cross1);
        assert_eq!(session.time_remaining, 180);
        assert!(!session.is_active);
    }

    #[tokio::test]
    async fn test_start_timer_at_zero_reloads_duration() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        patch_session(&f, |s| s.time_remaining = 0);

        let session = f.service.start_phase_timer(&f.match_id).await.unwrap();

        assert_eq!(session.time_remaining, 360);
        assert!(session.is_active);
    }

    #[tokio::test]
    async fn test_reset_reloads_and_stops() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        f.service.start_phase_timer(&f.match_id).await.unwrap();
        for _ in 0..5 {
            f.service.tick(&f.match_id).await.unwrap();
        }

        let session = f.service.reset_phase_timer(&f.match_id).await.unwrap();

        assert_eq!(session.time_remaining, 360);
        assert!(!session.is_active);
    }

    #[tokio::test]
    async fn test_prep_timer_runs_independently() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        f.service.start_prep_timer(&f.match_id).await.unwrap();

        f.service.tick(&f.match_id).await.unwrap();

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        // prep moved, the paused phase timer did not
        assert_eq!(session.prep_time_remaining, 239);
        assert_eq!(session.time_remaining, 360);

        // both countdowns can run in the same second
        f.service.start_phase_timer(&f.match_id).await.unwrap();
        f.service.tick(&f.match_id).await.unwrap();
        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.prep_time_remaining, 238);
        assert_eq!(session.time_remaining, 359);
    }

    #[tokio::test]
    async fn test_prep_expiry_stops_prep_only() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        f.service.start_prep_timer(&f.match_id).await.unwrap();
        patch_session(&f, |s| s.prep_time_remaining = 1);

        f.service.tick(&f.match_id).await.unwrap();

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!session.prep_active);
        assert_eq!(session.prep_time_remaining, 0);
        assert_eq!(session.current_phase, DebatePhase::Speech1);

        // prep restart reloads the full budget
        let session = f.service.start_prep_timer(&f.match_id).await.unwrap();
        assert_eq!(session.prep_time_remaining, 240);
    }

    #[tokio::test]
    async fn test_advance_walks_all_phases_then_awaits_judgment() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();

        let mut visited = vec![DebatePhase::Speech1];
        for _ in 0..7 {
            let session = f.service.advance_phase(&f.match_id).await.unwrap();
            visited.push(session.current_phase);
            assert!(!session.is_active);
        }
        assert_eq!(visited, DebatePhase::SEQUENCE.to_vec());

        // the eighth advance has nowhere to go without a judgment
        let result = f.service.advance_phase(&f.match_id).await;
        assert!(matches!(
            result,
            Err(DebateSessionServiceError::AwaitingJudgment)
        ));

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert!(session.awaiting_judgment);

        // the match is still active, not completed
        let stored = f
            .match_repository
            .get_match(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MatchStatus::Active);
    }

    #[tokio::test]
    async fn test_terminal_phase_expiry_flags_awaiting_judgment() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        for _ in 0..7 {
            f.service.advance_phase(&f.match_id).await.unwrap();
        }
        f.service.start_phase_timer(&f.match_id).await.unwrap();
        patch_session(&f, |s| s.time_remaining = 1);

        f.service.tick(&f.match_id).await.unwrap();

        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert!(session.awaiting_judgment);
        assert!(!session.is_active);
        assert_eq!(session.current_phase, DebatePhase::Summary2);
    }

    #[tokio::test]
    async fn test_complete_match_settles_ratings_and_cleans_up() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        for _ in 0..7 {
            f.service.advance_phase(&f.match_id).await.unwrap();
        }
        let _ = f.service.advance_phase(&f.match_id).await; // flag judgment

        let completed = f
            .service
            .complete_match(&f.match_id, MatchWinner::Host)
            .await
            .unwrap();

        assert_eq!(completed.status, MatchStatus::Completed);
        assert_eq!(completed.winner, Some(MatchWinner::Host));

        // session is gone, ratings settled at the fresh-player exchange
        assert!(f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .is_none());
        let host = f.ratings.get_rating_record(HOST).await.unwrap().unwrap();
        let opponent = f
            .ratings
            .get_rating_record(OPPONENT)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(host.rating, 1220);
        assert_eq!(opponent.rating, 1180);
        assert_eq!(host.games_played, 1);

        assert_eq!(f.sink.kinds(), vec![NotificationKind::RatingUpdated]);
        let event = &f.sink.events.lock().unwrap()[0];
        assert_eq!(event.recipients.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_completion_cannot_double_count() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        for _ in 0..7 {
            f.service.advance_phase(&f.match_id).await.unwrap();
        }
        let _ = f.service.advance_phase(&f.match_id).await;

        f.service
            .complete_match(&f.match_id, MatchWinner::Opponent)
            .await
            .unwrap();
        let second = f
            .service
            .complete_match(&f.match_id, MatchWinner::Opponent)
            .await;

        assert!(matches!(
            second,
            Err(DebateSessionServiceError::InvalidMatchState(_))
        ));
        let host = f.ratings.get_rating_record(HOST).await.unwrap().unwrap();
        assert_eq!(host.games_played, 1);
    }

    #[tokio::test]
    async fn test_complete_match_refuses_unfinished_debate() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();

        let result = f
            .service
            .complete_match(&f.match_id, MatchWinner::Host)
            .await;

        assert!(matches!(
            result,
            Err(DebateSessionServiceError::InvalidMatchState(_))
        ));
    }

    #[tokio::test]
    async fn test_tick_running_sessions_covers_each_running_timer() {
        let f = fixture().await;
        f.service.start_session(&f.match_id).await.unwrap();
        f.service.start_phase_timer(&f.match_id).await.unwrap();

        let ticked = f.service.tick_running_sessions().await.unwrap();

        assert_eq!(ticked, 1);
        let session = f
            .session_repository
            .get_session(&f.match_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.time_remaining, 359);
    }
}
