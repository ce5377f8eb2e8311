use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::errors::proposal_repository_errors::ProposalRepositoryError;

/// Negotiation failures, split the way callers need to react: validation
/// and authorization errors mean "fix the input", missing entities are
/// fatal to the operation, repository errors are infrastructure.
#[derive(Debug)]
pub enum NegotiationServiceError {
    /// Proposer already has a non-terminal proposal on this match.
    DuplicateProposal,
    /// A host may not propose on their own match.
    SelfProposal,
    InvalidMatchState(String),
    InvalidProposalState(String),
    NotAuthorized,
    MatchNotFound,
    ProposalNotFound,
    PlayerNotFound(String),
    MatchRepository(MatchRepositoryError),
    ProposalRepository(ProposalRepositoryError),
    PlayerRepository(PlayerRepositoryError),
}

impl std::fmt::Display for NegotiationServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationServiceError::DuplicateProposal => {
                write!(f, "Proposer already has an open proposal for this match")
            }
            NegotiationServiceError::SelfProposal => {
                write!(f, "Host cannot submit a proposal to their own match")
            }
            NegotiationServiceError::InvalidMatchState(msg) => {
                write!(f, "Invalid match state: {}", msg)
            }
            NegotiationServiceError::InvalidProposalState(msg) => {
                write!(f, "Invalid proposal state: {}", msg)
            }
            NegotiationServiceError::NotAuthorized => {
                write!(f, "Actor is not a party to this negotiation")
            }
            NegotiationServiceError::MatchNotFound => write!(f, "Match not found"),
            NegotiationServiceError::ProposalNotFound => write!(f, "Proposal not found"),
            NegotiationServiceError::PlayerNotFound(id) => {
                write!(f, "Player not found: {}", id)
            }
            NegotiationServiceError::MatchRepository(err) => {
                write!(f, "Match repository error: {}", err)
            }
            NegotiationServiceError::ProposalRepository(err) => {
                write!(f, "Proposal repository error: {}", err)
            }
            NegotiationServiceError::PlayerRepository(err) => {
                write!(f, "Player repository error: {}", err)
            }
        }
    }
}

impl std::error::Error for NegotiationServiceError {}

impl From<MatchRepositoryError> for NegotiationServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        NegotiationServiceError::MatchRepository(err)
    }
}

impl From<ProposalRepositoryError> for NegotiationServiceError {
    fn from(err: ProposalRepositoryError) -> Self {
        NegotiationServiceError::ProposalRepository(err)
    }
}
