use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::debate_match::MatchWinner;

/// Outcome verdict for a completed debate, written exactly once per match
/// by the external judging collaborator. One item per match, keyed by
/// `match_id`; the judgment-processor worker consumes the table's stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgment {
    pub match_id: String,
    pub winner: MatchWinner,
    pub judged_at: DateTime<Utc>,
}

impl Judgment {
    pub fn new(match_id: &str, winner: MatchWinner) -> Self {
        Judgment {
            match_id: match_id.to_string(),
            winner,
            judged_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judgment_round_trip() {
        let judgment = Judgment::new("match-1", MatchWinner::Opponent);

        let serialized = serde_json::to_string(&judgment).unwrap();
        let deserialized: Judgment = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.match_id, "match-1");
        assert_eq!(deserialized.winner, MatchWinner::Opponent);
    }
}
