use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::errors::rating_repository_errors::RatingRepositoryError;

#[derive(Debug)]
pub enum RatingServiceError {
    /// The player document itself is missing. A missing rating record is
    /// never an error; it defaults inside the transaction.
    PlayerNotFound(String),
    ValidationError(String),
    /// The paired commit kept losing its version guards; the whole
    /// operation may be retried by the caller.
    ConcurrencyConflict,
    Repository(RatingRepositoryError),
    PlayerRepository(PlayerRepositoryError),
}

impl std::fmt::Display for RatingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingServiceError::PlayerNotFound(id) => write!(f, "Player not found: {}", id),
            RatingServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RatingServiceError::ConcurrencyConflict => {
                write!(f, "Rating update kept conflicting with concurrent updates")
            }
            RatingServiceError::Repository(err) => write!(f, "Rating repository error: {}", err),
            RatingServiceError::PlayerRepository(err) => {
                write!(f, "Player repository error: {}", err)
            }
        }
    }
}

impl std::error::Error for RatingServiceError {}

impl From<RatingRepositoryError> for RatingServiceError {
    fn from(err: RatingRepositoryError) -> Self {
        RatingServiceError::Repository(err)
    }
}
