use log::{debug, info, warn};

use crate::{
    command::{self, ChannelKind},
    config::TopicNames,
    fan::FanController,
    gpio::DigitalPin,
    router::{CommandRouter, StatePublisher},
    MessageKind,
};

/// Single consumer of the message queue. Routes each payload by topic, and
/// drops anything that does not parse before it can reach the router.
pub struct Dispatcher<C, D, P, F> {
    topics: TopicNames,
    router: CommandRouter<C, D, P>,
    fan: Option<FanController<F>>,
}

impl<C, D, P, F> Dispatcher<C, D, P, F>
where
    C: DigitalPin,
    D: DigitalPin,
    P: StatePublisher,
    F: DigitalPin,
{
    pub fn new(
        topics: TopicNames,
        router: CommandRouter<C, D, P>,
        fan: Option<FanController<F>>,
    ) -> Self {
        Self {
            topics,
            router,
            fan,
        }
    }

    pub fn handle(&mut self, message: MessageKind) {
        match message {
            MessageKind::Connected => self.router.announce(),
            MessageKind::Inbound { topic, payload } => self.handle_inbound(&topic, &payload),
        }
    }

    fn handle_inbound(&mut self, topic: &str, payload: &[u8]) {
        info!(
            "Received on {}: {}",
            topic,
            String::from_utf8_lossy(payload)
        );

        let kind = if topic == self.topics.color {
            ChannelKind::Color
        } else if topic == self.topics.power {
            ChannelKind::Power
        } else if self.topics.fan.as_deref() == Some(topic) {
            self.handle_fan(payload);
            return;
        } else {
            debug!("Ignoring message on unknown topic {}", topic);
            return;
        };

        match command::parse(payload, kind) {
            Ok(command) => self.router.handle(command),
            Err(e) => warn!("Dropping {:?} command: {}", kind, e),
        }
    }

    fn handle_fan(&mut self, payload: &[u8]) {
        match self.fan.as_mut() {
            Some(fan) => {
                if fan.handle(payload).is_none() {
                    warn!(
                        "Invalid fan payload: {}",
                        String::from_utf8_lossy(payload)
                    );
                }
            }
            None => warn!("Fan topic is set but no fan pin is configured"),
        }
    }

    pub fn router(&self) -> &CommandRouter<C, D, P> {
        &self.router
    }

    pub fn shutdown(&mut self) {
        self.router.shutdown();
        if let Some(fan) = self.fan.as_mut() {
            fan.set(false);
        }
    }
}
