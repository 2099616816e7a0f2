use common::{DeviceInfo, LightDiscovery};

use crate::config::Config;

pub const PAYLOAD_ONLINE: &str = "online";
pub const PAYLOAD_OFFLINE: &str = "offline";

const STATE_TEMPLATE: &str = "{{ value_json.state }}";
const RGB_TEMPLATE: &str =
    "{{ value_json.color.r }},{{ value_json.color.g }},{{ value_json.color.b }}";

/// Discovery document announcing the strip as a light. Power commands go to
/// the power topic, colors to the color topic as `R,G,B`, and both the power
/// and the color state are read back from the JSON state notification.
pub fn light_discovery(config: &Config) -> LightDiscovery {
    let topics = config.topics();
    let device = &config.device;

    LightDiscovery {
        name: device.name.clone(),
        unique_id: format!("{}_light", device.id),
        command_topic: topics.power,
        rgb_command_topic: topics.color,
        state_topic: topics.state.clone(),
        state_value_template: STATE_TEMPLATE.to_string(),
        rgb_state_topic: topics.state,
        rgb_value_template: RGB_TEMPLATE.to_string(),
        availability_topic: topics.availability,
        payload_on: "ON".to_string(),
        payload_off: "OFF".to_string(),
        payload_available: PAYLOAD_ONLINE.to_string(),
        payload_not_available: PAYLOAD_OFFLINE.to_string(),
        device: DeviceInfo {
            name: device.name.clone(),
            identifiers: vec![device.id.clone()],
            manufacturer: device.manufacturer.clone(),
            model: device.model.clone(),
            sw_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        },
    }
}
