use serde::{Deserialize, Serialize};

/// The `state` field of a state notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerPayload {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbPayload {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// State notification published after every accepted command:
/// `{"state": "ON", "color": {"r": 1, "g": 2, "b": 3}}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    pub state: PowerPayload,
    pub color: RgbPayload,
}

#[cfg(feature = "std")]
impl StateMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
