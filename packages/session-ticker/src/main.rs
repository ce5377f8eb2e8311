use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};
use tracing_subscriber;

use shared::{
    repositories::{
        match_repository::DynamoDbMatchRepository,
        notification_repository::DynamoDbNotificationRepository,
        player_repository::DynamoDbPlayerRepository, rating_repository::DynamoDbRatingRepository,
        session_repository::DynamoDbSessionRepository,
    },
    services::{
        debate_session_service::DebateSessionService,
        notification_service::OutboxNotificationSink, rating_service::RatingService,
    },
};

/// Wall-clock driver for debate countdowns. Runs for the lifetime of the
/// process and applies one tick per second to every session with a
/// running phase or prep timer, independent of any request handler.
#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    // Set up AWS configuration and repositories
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let rating_repository = Arc::new(DynamoDbRatingRepository::new(client.clone()));
    let player_repository = Arc::new(DynamoDbPlayerRepository::new(client.clone()));
    let rating_service = RatingService::new(rating_repository, player_repository);

    let notification_repository = Arc::new(DynamoDbNotificationRepository::new(client.clone()));
    let notifications = Arc::new(OutboxNotificationSink::new(notification_repository));

    let session_repository = Arc::new(DynamoDbSessionRepository::new(client.clone()));
    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let session_service = DebateSessionService::new(
        session_repository,
        match_repository,
        rating_service,
        notifications,
    );

    info!("Session ticker starting");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // a delayed pass must not be followed by a burst of catch-up passes;
    // skipped seconds are simply lost to the countdowns
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        match session_service.tick_running_sessions().await {
            Ok(0) => {}
            Ok(count) => debug!("Applied tick to {} session(s)", count),
            Err(e) => error!("Ticker pass failed: {}", e),
        }
    }
}
