use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_dynamo::aws_sdk_dynamodb_1::from_item;
use shared::models::notification::NotificationEvent;
use shared::repositories::websocket_repository::DynamoDbWebSocketRepository;
use shared::services::websocket_service::WebSocketService;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    info!("Match notifier Lambda function starting");

    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);
    let websocket_service = WebSocketService::new(Arc::new(DynamoDbWebSocketRepository::new(
        dynamodb_client,
    )));

    run(service_fn(move |event: LambdaEvent<Event>| {
        let websocket_service = websocket_service.clone();
        async move {
            let (event, _context) = event.into_parts();

            info!("Processing {} records", event.records.len());

            for record in event.records {
                if let Err(e) = process_record(&websocket_service, record).await {
                    error!("Failed to process record: {}", e);
                }
            }

            Ok::<(), Error>(())
        }
    }))
    .await
}

async fn process_record(
    websocket_service: &WebSocketService,
    record: aws_lambda_events::event::dynamodb::EventRecord,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match record.event_name.as_str() {
        "INSERT" => {
            let new_image = record.change.new_image;
            let notification: NotificationEvent = from_item(new_image.into())?;
            info!(
                "Delivering {:?} notification for match {} to {} recipient(s)",
                notification.kind,
                notification.match_id,
                notification.recipients.len()
            );

            let message = serde_json::to_string(&notification)?;
            for recipient in &notification.recipients {
                // best-effort per recipient; one dead connection must not
                // block the rest
                if let Err(e) = websocket_service.send_to_player(recipient, &message).await {
                    error!("Delivery to {} failed: {}", recipient, e);
                }
            }
        }
        _ => {
            info!("Unhandled event type: {}", record.event_name);
        }
    }

    Ok(())
}
