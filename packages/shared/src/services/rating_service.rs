use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::models::rating::{RatingChange, RatingRecord};
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::errors::rating_repository_errors::RatingRepositoryError;
use crate::repositories::player_repository::PlayerRepository;
use crate::repositories::rating_repository::RatingRepository;
use crate::services::errors::rating_service_errors::RatingServiceError;

/// Attempts before a persistently conflicting commit is surfaced.
const MAX_COMMIT_ATTEMPTS: u32 = 5;

/// Outcome of a match from player A's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScore {
    Loss,
    Draw,
    Win,
}

impl MatchScore {
    pub fn value(self) -> f64 {
        match self {
            MatchScore::Loss => 0.0,
            MatchScore::Draw => 0.5,
            MatchScore::Win => 1.0,
        }
    }
}

/// Probability of A scoring against B under the Elo model.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf((rating_b - rating_a) as f64 / 400.0))
}

/// Update sensitivity: new players move fast, established strong players
/// move slowly.
pub fn k_factor(rating: i32, games_played: u32) -> i32 {
    if games_played < 30 {
        40
    } else if rating < 2100 {
        20
    } else {
        10
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingUpdate {
    pub new_a: i32,
    pub new_b: i32,
    pub delta_a: i32,
    pub delta_b: i32,
}

/// New ratings for both players given A's score. Each side rounds
/// independently, so the pair may drift one point from exact zero-sum.
pub fn compute_new_ratings(
    rating_a: i32,
    rating_b: i32,
    score_a: f64,
    k_a: i32,
    k_b: i32,
) -> RatingUpdate {
    let exp_a = expected_score(rating_a, rating_b);
    let exp_b = expected_score(rating_b, rating_a);

    let new_a = (rating_a as f64 + k_a as f64 * (score_a - exp_a)).round() as i32;
    let new_b = (rating_b as f64 + k_b as f64 * ((1.0 - score_a) - exp_b)).round() as i32;

    RatingUpdate {
        new_a,
        new_b,
        delta_a: new_a - rating_a,
        delta_b: new_b - rating_b,
    }
}

#[derive(Clone)]
pub struct RatingService {
    rating_repository: Arc<dyn RatingRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl RatingService {
    pub fn new(
        rating_repository: Arc<dyn RatingRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        RatingService {
            rating_repository,
            player_repository,
        }
    }

    /// A player's current rating state, defaulted if they have no record
    /// yet. The player must exist.
    pub async fn get_rating(&self, player_id: &str) -> Result<RatingRecord, RatingServiceError> {
        self.require_player(player_id).await?;
        let record = self
            .rating_repository
            .get_rating_record(player_id)
            .await?
            .unwrap_or_else(|| RatingRecord::new(player_id));
        Ok(record)
    }

    /// Apply one match outcome to both players atomically.
    ///
    /// Reads both records (defaulting absent ones), computes both new
    /// ratings, and commits the pair in a single version-guarded
    /// transaction. A lost guard means another update touched one of the
    /// players after our read; the whole read-compute-write cycle is
    /// retried so no commit is ever derived from a stale rating.
    pub async fn update_ratings(
        &self,
        player_a_id: &str,
        player_b_id: &str,
        score_a: MatchScore,
        match_id: &str,
    ) -> Result<(RatingChange, RatingChange), RatingServiceError> {
        if player_a_id == player_b_id {
            return Err(RatingServiceError::ValidationError(
                "cannot rate a player against themselves".to_string(),
            ));
        }

        self.require_player(player_a_id).await?;
        self.require_player(player_b_id).await?;

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let record_a = self
                .rating_repository
                .get_rating_record(player_a_id)
                .await?
                .unwrap_or_else(|| RatingRecord::new(player_a_id));
            let record_b = self
                .rating_repository
                .get_rating_record(player_b_id)
                .await?
                .unwrap_or_else(|| RatingRecord::new(player_b_id));

            let k_a = k_factor(record_a.rating, record_a.games_played);
            let k_b = k_factor(record_b.rating, record_b.games_played);
            let update =
                compute_new_ratings(record_a.rating, record_b.rating, score_a.value(), k_a, k_b);

            let now = Utc::now();
            let change_a = RatingChange {
                match_id: match_id.to_string(),
                old_rating: record_a.rating,
                new_rating: update.new_a,
                delta: update.delta_a,
                opponent_id: player_b_id.to_string(),
                recorded_at: now,
            };
            let change_b = RatingChange {
                match_id: match_id.to_string(),
                old_rating: record_b.rating,
                new_rating: update.new_b,
                delta: update.delta_b,
                opponent_id: player_a_id.to_string(),
                recorded_at: now,
            };

            let updated_a = record_a.applying_change(change_a.clone());
            let updated_b = record_b.applying_change(change_b.clone());

            match self
                .rating_repository
                .commit_rating_pair(&updated_a, &updated_b)
                .await
            {
                Ok(()) => {
                    info!(
                        "Ratings updated for match {}: {} {} -> {}, {} {} -> {}",
                        match_id,
                        player_a_id,
                        change_a.old_rating,
                        change_a.new_rating,
                        player_b_id,
                        change_b.old_rating,
                        change_b.new_rating
                    );
                    return Ok((change_a, change_b));
                }
                Err(RatingRepositoryError::VersionConflict) => {
                    warn!(
                        "Rating commit conflict for {} vs {} (attempt {}/{})",
                        player_a_id, player_b_id, attempt, MAX_COMMIT_ATTEMPTS
                    );
                    let backoff_ms = {
                        let mut rng = rand::thread_rng();
                        rng.gen_range(5..25) * attempt as u64
                    };
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(
            "Giving up on rating update for {} vs {} after {} attempts",
            player_a_id, player_b_id, MAX_COMMIT_ATTEMPTS
        );
        Err(RatingServiceError::ConcurrencyConflict)
    }

    async fn require_player(&self, player_id: &str) -> Result<(), RatingServiceError> {
        match self.player_repository.get_player(player_id).await {
            Ok(_) => Ok(()),
            Err(PlayerRepositoryError::NotFound) => {
                Err(RatingServiceError::PlayerNotFound(player_id.to_string()))
            }
            Err(e) => Err(RatingServiceError::PlayerRepository(e)),
        }
    }
}
