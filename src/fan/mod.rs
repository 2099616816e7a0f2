use log::info;

use crate::gpio::{DigitalPin, Level};

/// An independent on/off output next to the strip. It has no state
/// feedback and never touches the strip's device state.
pub struct FanController<P> {
    pin: P,
}

impl<P: DigitalPin> FanController<P> {
    pub fn new(mut pin: P) -> Self {
        pin.set(Level::Low);
        Self { pin }
    }

    /// Accepts `on` / `off` in any case. Returns the new setting, or `None`
    /// when the payload was not understood and nothing changed.
    pub fn handle(&mut self, payload: &[u8]) -> Option<bool> {
        let payload = String::from_utf8_lossy(payload);
        let on = match payload.trim().to_ascii_lowercase().as_str() {
            "on" => true,
            "off" => false,
            _ => return None,
        };

        self.set(on);
        Some(on)
    }

    pub fn set(&mut self, on: bool) {
        info!("Fan {}", if on { "ON" } else { "OFF" });
        self.pin.set(on.into());
    }
}
