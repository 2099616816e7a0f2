use std::time::Duration;

use log::{debug, trace};

use super::{Color, Frame};
use crate::gpio::{DigitalPin, Level};

/// Minimum time each clock level is held. The chip samples data on the
/// rising edge and needs this much setup and hold around it.
pub const PULSE_HOLD: Duration = Duration::from_micros(20);

/// Zero-data pulses sent before and after every frame
pub const FRAMING_PULSES: usize = 32;

/// Clock pulses making up one complete transmission
pub const PULSES_PER_TRANSMISSION: usize = FRAMING_PULSES * 2 + 32;

/// Bit-bangs frames into the strip controller over a clock and a data line.
///
/// `send` blocks until the whole transmission has been clocked out. It holds
/// `&mut self` for the duration, so only one frame is ever in flight.
pub struct ProtocolTransmitter<C, D> {
    clock: C,
    data: D,
}

impl<C: DigitalPin, D: DigitalPin> ProtocolTransmitter<C, D> {
    pub fn new(mut clock: C, mut data: D) -> Self {
        clock.set(Level::Low);
        data.set(Level::Low);

        Self { clock, data }
    }

    pub fn send(&mut self, color: Color) {
        let frame = Frame::encode(color);
        debug!("Sending {} as {:?}", color, frame);
        if let Ok(fields) = frame.unpack() {
            trace!("Frame fields:\n{}", fields);
        }

        self.begin();
        for bit in frame.bits() {
            self.data.set(bit.into());
            self.clock_pulse();
        }
        self.end();
    }

    /// Preamble
    fn begin(&mut self) {
        self.send_zeros();
    }

    /// Terminator
    pub fn end(&mut self) {
        self.send_zeros();
    }

    fn send_zeros(&mut self) {
        for _ in 0..FRAMING_PULSES {
            self.data.set(Level::Low);
            self.clock_pulse();
        }
    }

    fn clock_pulse(&mut self) {
        self.clock.set(Level::Low);
        std::thread::sleep(PULSE_HOLD);
        self.clock.set(Level::High);
        std::thread::sleep(PULSE_HOLD);
    }
}
