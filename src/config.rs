use std::path::Path;

use anyhow::Error;
use pi_pinout::{GpioPin, PhysicalPin, WiringPiPin};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "config.ron";
const CONFIG_PATH_VAR: &str = "RGB_STRIP_CONFIG";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("pins `{0}` and `{1}` are both mapped to GPIO {2}")]
    SharedPin(&'static str, &'static str, u8),
    #[error("mqtt port must not be 0")]
    InvalidPort,
    #[error("device id must not be empty")]
    EmptyDeviceId,
    #[error("keep alive of {0}s is below the 5s minimum")]
    KeepAlive(u64),
    #[error("topics `{0}` and `{1}` both subscribe to {2:?}")]
    SharedTopic(&'static str, &'static str, String),
    #[error("MQTT_PORT {0:?} is not a valid port")]
    EnvPort(String),
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub pins: Pins,
    pub mqtt: Mqtt,
    pub device: Device,
    #[serde(default)]
    pub topics: Topics,
    #[serde(default = "default_discovery_prefix")]
    pub discovery_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Pins {
    pub clock: Pin,
    pub data: Pin,
    #[serde(default)]
    pub fan: Option<Pin>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub enum Pin {
    Physical(PhysicalPin),
    Gpio(GpioPin),
    WiringPi(WiringPiPin),
}

impl Pin {
    /// BCM line number of this pin
    pub fn gpio(&self) -> u8 {
        let pin: GpioPin = match *self {
            Pin::Physical(pin) => pin.into(),
            Pin::Gpio(pin) => pin,
            Pin::WiringPi(pin) => pin.into(),
        };

        pin.0
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Mqtt {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Device {
    pub id: String,
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Topic overrides. Anything left out is derived from the device id.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Topics {
    pub color: Option<String>,
    pub power: Option<String>,
    pub state: Option<String>,
    pub availability: Option<String>,
    pub fan: Option<String>,
}

/// Fully resolved topic names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNames {
    pub color: String,
    pub power: String,
    pub state: String,
    pub availability: String,
    pub fan: Option<String>,
    pub discovery: String,
}

fn default_port() -> u16 {
    1883
}

fn default_keep_alive() -> u64 {
    60
}

fn default_device_name() -> String {
    "RGB Strip".to_string()
}

fn default_discovery_prefix() -> String {
    "homeassistant".to_string()
}

impl Config {
    /// Load the config from `$RGB_STRIP_CONFIG`, or `config.ron` in the
    /// working directory
    pub fn load() -> Result<Config, Error> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Config::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, Error> {
        Config::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Load a config file, then apply overrides looked up through `env`
    pub fn load_with_env(
        path: impl AsRef<Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, Error> {
        let config = std::fs::read_to_string(path)?;
        let mut config: Config = ron::from_str(&config)?;

        config.apply_env(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Deployments configured through a `.env` keep working: any of these
    /// variables wins over the file
    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = env("MQTT_BROKER") {
            self.mqtt.host = host;
        }
        if let Some(port) = env("MQTT_PORT") {
            self.mqtt.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvPort(port.clone()))?;
        }
        if let Some(user) = env("MQTT_USER") {
            self.mqtt.username = Some(user);
        }
        if let Some(pass) = env("MQTT_PASS") {
            self.mqtt.password = Some(pass);
        }
        if let Some(color) = env("MQTT_TOPIC_COLOR") {
            self.topics.color = Some(color);
        }
        if let Some(fan) = env("MQTT_TOPIC_FAN") {
            self.topics.fan = Some(fan);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.id.is_empty() {
            return Err(ConfigError::EmptyDeviceId);
        }
        if self.mqtt.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.mqtt.keep_alive_secs < 5 {
            return Err(ConfigError::KeepAlive(self.mqtt.keep_alive_secs));
        }

        let clock = self.pins.clock.gpio();
        let data = self.pins.data.gpio();
        if clock == data {
            return Err(ConfigError::SharedPin("clock", "data", clock));
        }

        if let Some(fan) = self.pins.fan.as_ref().map(Pin::gpio) {
            if fan == clock {
                return Err(ConfigError::SharedPin("fan", "clock", fan));
            }
            if fan == data {
                return Err(ConfigError::SharedPin("fan", "data", fan));
            }
        }

        // Inbound payloads are routed by topic alone
        let topics = self.topics();
        let mut commands = vec![("color", &topics.color), ("power", &topics.power)];
        if let Some(fan) = &topics.fan {
            commands.push(("fan", fan));
        }
        for (i, (name, topic)) in commands.iter().enumerate() {
            if let Some((other, _)) = commands[..i].iter().find(|(_, seen)| seen == topic) {
                return Err(ConfigError::SharedTopic(*other, *name, topic.to_string()));
            }
        }

        Ok(())
    }

    pub fn client_id(&self) -> String {
        self.mqtt
            .client_id
            .clone()
            .unwrap_or_else(|| format!("rgb-strip-{}", self.device.id))
    }

    pub fn topics(&self) -> TopicNames {
        let base = format!("rgb-strip/{}", self.device.id);
        let topics = &self.topics;

        TopicNames {
            color: topics
                .color
                .clone()
                .unwrap_or_else(|| format!("{}/color/set", base)),
            power: topics
                .power
                .clone()
                .unwrap_or_else(|| format!("{}/power/set", base)),
            state: topics
                .state
                .clone()
                .unwrap_or_else(|| format!("{}/state", base)),
            availability: topics
                .availability
                .clone()
                .unwrap_or_else(|| format!("{}/availability", base)),
            fan: topics.fan.clone(),
            discovery: format!(
                "{}/light/{}/config",
                self.discovery_prefix, self.device.id
            ),
        }
    }
}
