pub mod errors;
pub mod match_repository;
pub mod notification_repository;
pub mod player_repository;
pub mod proposal_repository;
pub mod rating_repository;
pub mod session_repository;
pub mod websocket_repository;
