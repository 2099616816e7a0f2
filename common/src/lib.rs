pub mod discovery;
pub mod state;

pub use discovery::{DeviceInfo, LightDiscovery};
pub use state::{PowerPayload, RgbPayload, StateMessage};
