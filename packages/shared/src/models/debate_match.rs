use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebateFormat {
    LincolnDouglas,
    PublicForum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    Ready,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchWinner {
    Host,
    Opponent,
}

/// A scheduled, in-progress, or completed debate.
/// One DynamoDB item per match, keyed by `match_id`.
/// `opponent_id` and the schedule fields are only set once a proposal
/// has been accepted; `winner` only once the match is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateMatch {
    pub match_id: String,
    pub host_id: String,
    pub opponent_id: Option<String>,
    pub format: DebateFormat,
    pub time_control: String,
    pub difficulty: String,
    pub status: MatchStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub scheduled_timezone: Option<String>,
    pub accepted_proposal_id: Option<String>,
    pub winner: Option<MatchWinner>,
    pub created_at: DateTime<Utc>,
}

impl DebateMatch {
    pub fn new(host_id: &str, format: DebateFormat, time_control: &str, difficulty: &str) -> Self {
        DebateMatch {
            match_id: Uuid::new_v4().to_string(),
            host_id: host_id.to_string(),
            opponent_id: None,
            format,
            time_control: time_control.to_string(),
            difficulty: difficulty.to_string(),
            status: MatchStatus::Waiting,
            scheduled_time: None,
            scheduled_timezone: None,
            accepted_proposal_id: None,
            winner: None,
            created_at: Utc::now(),
        }
    }

    /// Id of the player on the given side. `None` for the opponent side
    /// while the match is still waiting.
    pub fn player_on_side(&self, side: MatchWinner) -> Option<&str> {
        match side {
            MatchWinner::Host => Some(self.host_id.as_str()),
            MatchWinner::Opponent => self.opponent_id.as_deref(),
        }
    }
}
