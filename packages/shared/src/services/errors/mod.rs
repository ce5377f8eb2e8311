pub mod debate_session_service_errors;
pub mod negotiation_service_errors;
pub mod rating_service_errors;
