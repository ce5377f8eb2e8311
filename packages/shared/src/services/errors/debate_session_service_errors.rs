use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;
use crate::services::errors::rating_service_errors::RatingServiceError;

#[derive(Debug)]
pub enum DebateSessionServiceError {
    MatchNotFound,
    SessionNotFound,
    InvalidMatchState(String),
    /// The debate reached its terminal phase; completion needs an external
    /// judgment. Recoverable — the match stays active.
    AwaitingJudgment,
    ConcurrencyConflict,
    Rating(RatingServiceError),
    MatchRepository(MatchRepositoryError),
    SessionRepository(SessionRepositoryError),
}

impl std::fmt::Display for DebateSessionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebateSessionServiceError::MatchNotFound => write!(f, "Match not found"),
            DebateSessionServiceError::SessionNotFound => write!(f, "Debate session not found"),
            DebateSessionServiceError::InvalidMatchState(msg) => {
                write!(f, "Invalid match state: {}", msg)
            }
            DebateSessionServiceError::AwaitingJudgment => {
                write!(f, "Debate finished; awaiting external judgment")
            }
            DebateSessionServiceError::ConcurrencyConflict => {
                write!(f, "Session kept conflicting with concurrent timer operations")
            }
            DebateSessionServiceError::Rating(err) => write!(f, "Rating error: {}", err),
            DebateSessionServiceError::MatchRepository(err) => {
                write!(f, "Match repository error: {}", err)
            }
            DebateSessionServiceError::SessionRepository(err) => {
                write!(f, "Session repository error: {}", err)
            }
        }
    }
}

impl std::error::Error for DebateSessionServiceError {}

impl From<RatingServiceError> for DebateSessionServiceError {
    fn from(err: RatingServiceError) -> Self {
        DebateSessionServiceError::Rating(err)
    }
}

impl From<MatchRepositoryError> for DebateSessionServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        DebateSessionServiceError::MatchRepository(err)
    }
}

impl From<SessionRepositoryError> for DebateSessionServiceError {
    fn from(err: SessionRepositoryError) -> Self {
        DebateSessionServiceError::SessionRepository(err)
    }
}
