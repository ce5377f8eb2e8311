use crate::models::player::Player;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbPlayerRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbPlayerRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("PLAYERS_TABLE")
            .expect("PLAYERS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError>;
    async fn get_player(&self, player_id: &str) -> Result<Player, PlayerRepositoryError>;
}

#[async_trait]
impl PlayerRepository for DynamoDbPlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError> {
        let item =
            to_item(player).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(player_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(PlayerRepositoryError::AlreadyExists);
                    }
                }
                Err(PlayerRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_player(&self, player_id: &str) -> Result<Player, PlayerRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "player_id",
                to_attribute_value(player_id)
                    .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let player: Player = from_item(item)
                .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
            Ok(player)
        } else {
            Err(PlayerRepositoryError::NotFound)
        }
    }
}
