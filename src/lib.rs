pub mod command;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod fan;
pub mod gpio;
pub mod mqtt;
pub mod router;
pub mod strip;

pub mod prelude {
    pub use crate::{
        command::*, config::*, device::*, dispatch::*, fan::*, gpio::*, mqtt::*, router::*,
        strip::*,
    };
}

/// Messages that should be processed in the queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// The bus (re)connected and subscriptions are in place
    Connected,
    /// A payload arrived on a subscribed topic
    Inbound { topic: String, payload: Vec<u8> },
}
