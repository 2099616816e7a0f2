//! MQTT transport
//!
//! Owns the broker connection. Inbound publishes are forwarded one at a time
//! to the message queue; the dispatch loop on the other end is the only code
//! that touches the strip.

use std::time::Duration;

use anyhow::Error;
use common::StateMessage;
use log::{error, info, warn};
use rumqttc::{AsyncClient, ClientError, Event, EventLoop, Incoming, LastWill, MqttOptions, QoS};
use tokio::sync::mpsc;

use crate::{config::Config, config::TopicNames, router::StatePublisher, MessageKind};

use self::discovery::{light_discovery, PAYLOAD_OFFLINE, PAYLOAD_ONLINE};

pub mod discovery;

const REQUEST_CAPACITY: usize = 100;
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub struct MqttBridge {
    client: AsyncClient,
    topics: TopicNames,
}

impl MqttBridge {
    /// Start the connection. Returns immediately; the event loop keeps
    /// connecting in the background and announces itself on every ConnAck.
    pub fn start(config: &Config, message_queue: mpsc::Sender<MessageKind>) -> Result<Self, Error> {
        let topics = config.topics();

        let mut options = MqttOptions::new(config.client_id(), &config.mqtt.host, config.mqtt.port);
        options.set_keep_alive(Duration::from_secs(config.mqtt.keep_alive_secs));
        options.set_last_will(LastWill::new(
            &topics.availability,
            PAYLOAD_OFFLINE,
            QoS::AtLeastOnce,
            true,
        ));

        if let (Some(user), Some(pass)) = (&config.mqtt.username, &config.mqtt.password) {
            options.set_credentials(user, pass);
        }

        let discovery = light_discovery(config).to_json()?;
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        info!(
            "MQTT connecting to {}:{}...",
            config.mqtt.host, config.mqtt.port
        );

        tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            topics.clone(),
            discovery,
            message_queue,
        ));

        Ok(Self { client, topics })
    }

    pub fn state_publisher(&self) -> MqttStatePublisher {
        MqttStatePublisher {
            client: self.client.clone(),
            topic: self.topics.state.clone(),
        }
    }

    pub async fn stop(&self) {
        if let Err(e) = self.client.disconnect().await {
            warn!("MQTT disconnect failed: {}", e);
        }
    }
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topics: TopicNames,
    discovery: String,
    message_queue: mpsc::Sender<MessageKind>,
) {
    loop {
        let message = match eventloop.poll().await {
            Ok(Event::Incoming(Incoming::ConnAck(ack))) => {
                info!("MQTT connected (code: {:?})", ack.code);
                if let Err(e) = announce(&client, &topics, &discovery) {
                    error!("Failed to subscribe and announce: {}", e);
                }
                MessageKind::Connected
            }
            Ok(Event::Incoming(Incoming::Publish(publish))) => MessageKind::Inbound {
                topic: publish.topic,
                payload: publish.payload.to_vec(),
            },
            Ok(Event::Incoming(Incoming::Disconnect)) => {
                warn!("MQTT disconnected");
                continue;
            }
            Ok(_) => continue,
            Err(e) => {
                error!("MQTT error: {}", e);
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        if message_queue.send(message).await.is_err() {
            info!("Message queue closed, stopping MQTT event loop");
            break;
        }
    }
}

/// Subscriptions do not survive a clean-session reconnect, so this runs on
/// every ConnAck
fn announce(client: &AsyncClient, topics: &TopicNames, discovery: &str) -> Result<(), ClientError> {
    for topic in subscriptions(topics) {
        client.try_subscribe(topic, QoS::AtLeastOnce)?;
    }

    client.try_publish(&topics.discovery, QoS::AtLeastOnce, true, discovery)?;
    client.try_publish(&topics.availability, QoS::AtLeastOnce, true, PAYLOAD_ONLINE)?;

    Ok(())
}

fn subscriptions(topics: &TopicNames) -> Vec<&str> {
    let mut subscriptions = vec![topics.color.as_str(), topics.power.as_str()];
    if let Some(fan) = topics.fan.as_deref() {
        subscriptions.push(fan);
    }
    subscriptions
}

/// Publishes the retained state notification
pub struct MqttStatePublisher {
    client: AsyncClient,
    topic: String,
}

impl StatePublisher for MqttStatePublisher {
    fn publish_state(&mut self, state: &StateMessage) {
        let payload = match state.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize state: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .client
            .try_publish(&self.topic, QoS::AtLeastOnce, true, payload)
        {
            error!("Failed to publish state: {}", e);
        }
    }
}
