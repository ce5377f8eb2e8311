use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player profile. Account management lives outside this backend; the
/// core only reads players to resolve existence and display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(display_name: &str) -> Self {
        Player {
            player_id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        }
    }
}
