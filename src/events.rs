use std::time::Duration;

use amqprs::{
    callbacks::{DefaultChannelCallback, DefaultConnectionCallback},
    channel::{
        BasicPublishArguments, Channel, ExchangeDeclareArguments, ExchangeType,
        QueueBindArguments, QueueDeclareArguments,
    },
    connection::{Connection, OpenConnectionArguments},
    BasicProperties, DELIVERY_MODE_PERSISTENT,
};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::time::timeout;
use tracing::{event, Level};

use crate::config::AppConfig;
use crate::domain::{Product, ProductMessage};
use crate::error::BffError;

/// Publishes derived product messages to the configured topic.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish_products(&self, products: &[Product]) -> Result<(), BffError>;
}

pub struct RabbitMqMessageBroker {
    connection: Connection,
    topic: String,
    send_timeout: Duration,
}

impl RabbitMqMessageBroker {
    pub async fn new(config: &AppConfig) -> Result<RabbitMqMessageBroker, String> {
        match Connection::open(&OpenConnectionArguments::new(
            &config.broker_host,
            config.broker_port,
            &config.broker_user,
            &config.broker_pass,
        ))
        .await
        {
            Ok(connection) => {
                match connection.register_callback(DefaultConnectionCallback).await {
                    Ok(()) => Ok(RabbitMqMessageBroker {
                        connection,
                        topic: config.broker_topic.clone(),
                        send_timeout: config.publish_timeout,
                    }),
                    Err(e) => Err(format!("Failed to register connection callback: {}", e)),
                }
            }
            Err(e) => Err(format!("Failed to open broker connection: {}", e)),
        }
    }

    async fn get_channel(&self) -> Result<Channel, BffError> {
        let channel = match self.connection.open_channel(None).await {
            Ok(channel) => channel,
            Err(e) => return Err(BffError::Internal(format!("Failed to get channel: {}", e))),
        };

        channel
            .register_callback(DefaultChannelCallback)
            .await
            .map_err(|e| BffError::Internal(format!("Failed to register channel callback: {}", e)))?;
        channel
            .exchange_declare(ExchangeDeclareArguments::new(
                &self.topic,
                &ExchangeType::Fanout.to_string(),
            ))
            .await
            .map_err(|e| BffError::Internal(format!("Failed to declare exchange: {}", e)))?;
        channel
            .queue_declare(QueueDeclareArguments::durable_client_named(&self.topic))
            .await
            .map_err(|e| BffError::Internal(format!("Failed to declare queue: {}", e)))?;
        channel
            .queue_bind(QueueBindArguments::new(&self.topic, &self.topic, ""))
            .await
            .map_err(|e| BffError::Internal(format!("Failed to bind queue: {}", e)))?;

        Ok(channel)
    }

    async fn send_single_product(
        &self,
        channel: &Channel,
        product: &Product,
    ) -> Result<(), BffError> {
        let message = ProductMessage::from(product);

        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                return Err(BffError::Internal(format!(
                    "error serializing product message for id {}: {}",
                    product.id, e
                )))
            }
        };

        // The message id carries the product identifier in string form so
        // downstream consumers can key on it.
        let mut properties = BasicProperties::default();
        properties
            .with_delivery_mode(DELIVERY_MODE_PERSISTENT)
            .with_message_id(&product.id.to_string());

        let publish = channel.basic_publish(
            properties,
            payload,
            BasicPublishArguments::new(&self.topic, ""),
        );

        match timeout(self.send_timeout, publish).await {
            Ok(Ok(())) => {
                event!(Level::DEBUG, "published product message for id {}", product.id);
                Ok(())
            }
            Ok(Err(e)) => Err(BffError::Internal(format!(
                "error publishing product message for id {}: {}",
                product.id, e
            ))),
            Err(_) => Err(BffError::Internal(format!(
                "timed out publishing product message for id {}",
                product.id
            ))),
        }
    }
}

#[async_trait]
impl MessageBroker for RabbitMqMessageBroker {
    async fn publish_products(&self, products: &[Product]) -> Result<(), BffError> {
        if products.is_empty() {
            return Ok(());
        }

        let channel = self.get_channel().await?;

        // First failure aborts the batch.
        for product in products {
            if let Err(e) = self.send_single_product(&channel, product).await {
                event!(Level::WARN, "aborting product message batch: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }
}
