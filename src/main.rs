use anyhow::Error;
use log::{info, warn};
use rgb_strip_bridge::prelude::*;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Broker, topics and credentials may also come from a .env
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load the config file
    info!("Starting config...");
    let config = Config::load()?;
    let topics = config.topics();

    // Initialize the lines
    info!("Starting GPIO...");
    let lines = GpioLines::init(&config)?;
    if topics.fan.is_some() && lines.fan.is_none() {
        warn!("Fan topic configured without a fan pin, fan commands will be ignored");
    }

    // Message queue
    let (message_queue_tx, mut message_queue_rx) = mpsc::channel(100);

    info!("Starting MQTT...");
    let bridge = MqttBridge::start(&config, message_queue_tx)?;

    let transmitter = ProtocolTransmitter::new(lines.clock, lines.data);
    let router = CommandRouter::new(transmitter, bridge.state_publisher());
    let fan = lines.fan.map(FanController::new);
    let mut dispatcher = Dispatcher::new(topics, router, fan);

    info!("RGB driver ready. Waiting for commands...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            message = message_queue_rx.recv() => match message {
                // A transmission blocks for a few milliseconds and must not
                // be interleaved with anything else
                Some(message) => tokio::task::block_in_place(|| dispatcher.handle(message)),
                None => break,
            },
        }
    }

    dispatcher.shutdown();
    bridge.stop().await;

    Ok(())
}
