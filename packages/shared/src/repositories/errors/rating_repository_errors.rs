#[derive(Debug)]
pub enum RatingRepositoryError {
    /// A record's version no longer matched at commit time; the caller
    /// must re-read and recompute.
    VersionConflict,
    Serialization(String),
    DynamoDb(String),
    Transaction(String),
}

impl std::fmt::Display for RatingRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingRepositoryError::VersionConflict => {
                write!(f, "Rating record was modified concurrently")
            }
            RatingRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            RatingRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            RatingRepositoryError::Transaction(msg) => write!(f, "Transaction error: {}", msg),
        }
    }
}

impl std::error::Error for RatingRepositoryError {}
