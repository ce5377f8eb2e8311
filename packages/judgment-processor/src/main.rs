use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;
use tracing_subscriber;

mod processor;
use processor::JudgmentProcessor;
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

#[tokio::main]
async fn main() -> Result<(), Error> {
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

    let processor = JudgmentProcessor::new(session_service);

    // Run the Lambda function
    run(service_fn(
        move |event: lambda_runtime::LambdaEvent<aws_lambda_events::event::dynamodb::Event>| {
            let processor = processor.clone();
            async move { processor.process_event(event.payload).await }
        },
    ))
    .await
}
