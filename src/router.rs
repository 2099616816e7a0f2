use common::StateMessage;
use log::info;

use crate::{
    command::Command,
    device::DeviceState,
    gpio::DigitalPin,
    strip::ProtocolTransmitter,
};

/// Receives the device state after every accepted command
pub trait StatePublisher {
    fn publish_state(&mut self, state: &StateMessage);
}

/// Owns the device state and the transmitter. Every accepted command
/// transmits exactly one frame and publishes exactly one state, even when
/// nothing changed.
pub struct CommandRouter<C, D, P> {
    state: DeviceState,
    transmitter: ProtocolTransmitter<C, D>,
    publisher: P,
}

impl<C: DigitalPin, D: DigitalPin, P: StatePublisher> CommandRouter<C, D, P> {
    pub fn new(transmitter: ProtocolTransmitter<C, D>, publisher: P) -> Self {
        Self {
            state: DeviceState::new(),
            transmitter,
            publisher,
        }
    }

    pub fn handle(&mut self, command: Command) {
        let color = self.state.apply(command);
        info!(
            "{:?}: power {:?}, sending {}",
            command, self.state.power, color
        );

        self.transmitter.send(color);
        self.announce();
    }

    /// Publish the current state without transmitting anything
    pub fn announce(&mut self) {
        self.publisher.publish_state(&StateMessage::from(&self.state));
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Clock out a final terminator before the lines are released
    pub fn shutdown(&mut self) {
        self.transmitter.end();
    }
}
