pub mod match_repository_errors;
pub mod notification_repository_errors;
pub mod player_repository_errors;
pub mod proposal_repository_errors;
pub mod rating_repository_errors;
pub mod session_repository_errors;
