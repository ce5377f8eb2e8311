#[derive(Debug)]
pub enum ProposalRepositoryError {
    NotFound,
    AlreadyExists,
    /// A status-guarded single-item write lost its compare-and-swap.
    StateConflict,
    /// The acceptance transaction was cancelled on a condition check.
    TransactionConflict,
    Serialization(String),
    DynamoDb(String),
    Transaction(String),
}

impl std::fmt::Display for ProposalRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalRepositoryError::NotFound => write!(f, "Proposal not found"),
            ProposalRepositoryError::AlreadyExists => write!(f, "Proposal already exists"),
            ProposalRepositoryError::StateConflict => {
                write!(f, "Proposal was modified concurrently")
            }
            ProposalRepositoryError::TransactionConflict => {
                write!(f, "Acceptance transaction lost a condition check")
            }
            ProposalRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ProposalRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            ProposalRepositoryError::Transaction(msg) => write!(f, "Transaction error: {}", msg),
        }
    }
}

impl std::error::Error for ProposalRepositoryError {}
