pub mod debate_session_service;
pub mod errors;
pub mod negotiation_service;
pub mod notification_service;
pub mod rating_service;
pub mod websocket_service;
