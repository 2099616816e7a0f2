use common::{PowerPayload, StateMessage};

use crate::{command::Command, strip::Color};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl From<PowerState> for PowerPayload {
    fn from(power: PowerState) -> Self {
        match power {
            PowerState::On => PowerPayload::On,
            PowerState::Off => PowerPayload::Off,
        }
    }
}

/// Power plus the remembered color. Turning off never forgets the color, it
/// only blanks the strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub power: PowerState,
    pub last_color: Color,
}

impl DeviceState {
    /// Off and black, as at every process start
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and return the color the strip should now show
    pub fn apply(&mut self, command: Command) -> Color {
        match command {
            Command::SetColor(color) => {
                self.last_color = color;
                self.power = PowerState::On;
            }
            Command::SetPower(on) => {
                self.power = on.into();
            }
        }

        self.output_color()
    }

    /// What the strip shows in this state
    pub fn output_color(&self) -> Color {
        match self.power {
            PowerState::On => self.last_color,
            PowerState::Off => Color::BLACK,
        }
    }
}

impl From<&DeviceState> for StateMessage {
    fn from(state: &DeviceState) -> Self {
        StateMessage {
            state: state.power.into(),
            color: state.last_color.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use common::RgbPayload;

    use super::*;

    const TEAL: Color = Color::new(0, 128, 128);

    #[test]
    fn test_initial_state() {
        let state = DeviceState::new();
        assert_eq!(state.power, PowerState::Off);
        assert_eq!(state.last_color, Color::BLACK);
        assert_eq!(state.output_color(), Color::BLACK);
    }

    #[test]
    fn test_set_color_turns_on() {
        let mut state = DeviceState::new();

        assert_eq!(state.apply(Command::SetColor(TEAL)), TEAL);
        assert_eq!(state.power, PowerState::On);
        assert_eq!(state.last_color, TEAL);
    }

    #[test]
    fn test_power_off_keeps_color() {
        let mut state = DeviceState::new();
        state.apply(Command::SetColor(TEAL));

        assert_eq!(state.apply(Command::SetPower(false)), Color::BLACK);
        assert_eq!(state.power, PowerState::Off);
        assert_eq!(state.last_color, TEAL);

        assert_eq!(state.apply(Command::SetPower(true)), TEAL);
        assert_eq!(state.power, PowerState::On);
    }

    #[test]
    fn test_power_on_without_color_is_black() {
        let mut state = DeviceState::new();

        assert_eq!(state.apply(Command::SetPower(true)), Color::BLACK);
        assert_eq!(state.power, PowerState::On);
    }

    #[test]
    fn test_repeated_power_is_idempotent() {
        let mut state = DeviceState::new();
        state.apply(Command::SetColor(TEAL));

        let first = state.apply(Command::SetPower(true));
        let after_first = state;
        let second = state.apply(Command::SetPower(true));

        assert_eq!(first, second);
        assert_eq!(after_first, state);
    }

    #[test]
    fn test_set_color_while_on() {
        let mut state = DeviceState::new();
        state.apply(Command::SetColor(TEAL));

        let red = Color::new(255, 0, 0);
        assert_eq!(state.apply(Command::SetColor(red)), red);
        assert_eq!(state.last_color, red);
    }

    #[test]
    fn test_state_message() {
        let mut state = DeviceState::new();
        state.apply(Command::SetColor(Color::new(5, 6, 7)));
        state.apply(Command::SetPower(false));

        assert_eq!(
            StateMessage::from(&state),
            StateMessage {
                state: PowerPayload::Off,
                color: RgbPayload { r: 5, g: 6, b: 7 },
            }
        );
    }
}
