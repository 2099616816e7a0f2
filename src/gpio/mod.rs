use anyhow::Error;
use log::info;

#[cfg(feature = "pi")]
use rppal::gpio::{Gpio, OutputPin};

#[cfg(not(feature = "pi"))]
use log::trace;

use crate::config::{Config, Pin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A digital output line that can be driven high or low.
///
/// Setting a level is assumed to always succeed once the line has been
/// opened; failures have to surface while opening it.
pub trait DigitalPin {
    fn set(&mut self, level: Level);
}

#[cfg(feature = "pi")]
pub struct OutputLine {
    pin: OutputPin,
}

/// Stand-in for a GPIO line on hosts without the `pi` feature
#[cfg(not(feature = "pi"))]
pub struct OutputLine {
    gpio: u8,
    level: Level,
}

impl OutputLine {
    /// Open a line as an output and drive it low
    #[cfg(feature = "pi")]
    pub fn open(gpio: u8) -> Result<Self, Error> {
        let pin = Gpio::new()?.get(gpio)?.into_output_low();
        Ok(Self { pin })
    }

    #[cfg(not(feature = "pi"))]
    pub fn open(gpio: u8) -> Result<Self, Error> {
        Ok(Self {
            gpio,
            level: Level::Low,
        })
    }
}

impl DigitalPin for OutputLine {
    #[cfg(feature = "pi")]
    fn set(&mut self, level: Level) {
        match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        }
    }

    #[cfg(not(feature = "pi"))]
    fn set(&mut self, level: Level) {
        trace!("GPIO {}: {:?} -> {:?}", self.gpio, self.level, level);
        self.level = level;
    }
}

/// Every output line the bridge drives
pub struct GpioLines {
    pub clock: OutputLine,
    pub data: OutputLine,
    pub fan: Option<OutputLine>,
}

impl GpioLines {
    pub fn init(config: &Config) -> Result<Self, Error> {
        let clock = open_line("clock", &config.pins.clock)?;
        let data = open_line("data", &config.pins.data)?;
        let fan = config
            .pins
            .fan
            .as_ref()
            .map(|pin| open_line("fan", pin))
            .transpose()?;

        Ok(Self { clock, data, fan })
    }
}

fn open_line(name: &str, pin: &Pin) -> Result<OutputLine, Error> {
    let gpio = pin.gpio();
    info!("Line {}: initializing on GPIO {}", name, gpio);

    OutputLine::open(gpio)
}
