pub mod debate_match;
pub mod debate_session;
pub mod judgment;
pub mod notification;
pub mod player;
pub mod proposal;
pub mod rating;
