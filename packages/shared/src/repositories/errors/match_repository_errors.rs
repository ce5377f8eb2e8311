#[derive(Debug)]
pub enum MatchRepositoryError {
    NotFound,
    /// A status-guarded write lost its compare-and-swap.
    StateConflict,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for MatchRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRepositoryError::NotFound => write!(f, "Match not found"),
            MatchRepositoryError::StateConflict => {
                write!(f, "Match was modified concurrently")
            }
            MatchRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            MatchRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for MatchRepositoryError {}
