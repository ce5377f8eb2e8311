use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starting rating for players without a rating record.
pub const DEFAULT_RATING: i32 = 1200;

/// Most recent history entries kept per player. Keeps the record item well
/// under DynamoDB's item-size ceiling.
pub const RATING_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub match_id: String,
    pub old_rating: i32,
    pub new_rating: i32,
    pub delta: i32,
    pub opponent_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// One player's rating state.
/// One DynamoDB item per player, keyed by `player_id`. Created lazily on
/// the player's first completed match; after that, mutated only by the
/// paired rating-update transaction. `version` is the optimistic-lock
/// counter that transaction conditions on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRecord {
    pub player_id: String,
    pub rating: i32,
    pub games_played: u32,
    pub rating_history: Vec<RatingChange>,
    pub version: u64,
}

impl RatingRecord {
    /// Fresh record for a player with no rating history yet. `version` 0
    /// marks a record that has never been persisted.
    pub fn new(player_id: &str) -> Self {
        RatingRecord {
            player_id: player_id.to_string(),
            rating: DEFAULT_RATING,
            games_played: 0,
            rating_history: Vec::new(),
            version: 0,
        }
    }

    /// The record after applying one rating change: rating moves to the
    /// change's new value, the game counter increments, the change is
    /// appended to history (oldest entries dropped past the bound), and the
    /// version advances.
    pub fn applying_change(&self, change: RatingChange) -> RatingRecord {
        let mut updated = self.clone();
        updated.rating = change.new_rating;
        updated.games_played += 1;
        updated.rating_history.push(change);
        if updated.rating_history.len() > RATING_HISTORY_LIMIT {
            let excess = updated.rating_history.len() - RATING_HISTORY_LIMIT;
            updated.rating_history.drain(..excess);
        }
        updated.version += 1;
        updated
    }
}
