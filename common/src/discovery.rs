//! Home Assistant discovery payload for the strip
//!
//! Matches the JSON schema Home Assistant expects for an MQTT light using the
//! default (non-JSON) command schema: power and color arrive on separate
//! topics, state is read back from one JSON document through templates.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub identifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightDiscovery {
    pub name: String,
    pub unique_id: String,
    /// Receives `ON` / `OFF`
    pub command_topic: String,
    /// Receives `R,G,B`
    pub rgb_command_topic: String,
    pub state_topic: String,
    pub state_value_template: String,
    pub rgb_state_topic: String,
    pub rgb_value_template: String,
    pub availability_topic: String,
    pub payload_on: String,
    pub payload_off: String,
    pub payload_available: String,
    pub payload_not_available: String,
    pub device: DeviceInfo,
}

#[cfg(feature = "std")]
impl LightDiscovery {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
