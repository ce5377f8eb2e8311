use std::sync::Arc;
use tracing::info;

use crate::repositories::websocket_repository::WebSocketRepository;

#[derive(Clone)]
pub struct WebSocketService {
    repository: Arc<dyn WebSocketRepository>,
}

impl WebSocketService {
    pub fn new(repository: Arc<dyn WebSocketRepository>) -> Self {
        Self { repository }
    }

    pub async fn store_connection(
        &self,
        player_id: &str,
        connection_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Storing WebSocket connection for player: {}", player_id);
        self.repository
            .store_connection(player_id, connection_id)
            .await
    }

    pub async fn remove_connection(
        &self,
        player_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Removing WebSocket connection for player: {}", player_id);
        self.repository.remove_connection(player_id).await
    }

    /// Deliver a message to a player if they are connected; a player
    /// without a live connection is skipped, not an error.
    pub async fn send_to_player(
        &self,
        player_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(connection_id) = self.repository.get_connection_id(player_id).await? {
            info!("Sending notification to player {}", player_id);
            self.repository
                .send_message(&connection_id, message)
                .await?;
        } else {
            info!(
                "Player {} is not connected, skipping notification",
                player_id
            );
        }
        Ok(())
    }
}
