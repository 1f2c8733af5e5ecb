//! Bind the Steam Deck controller and log every change.
//!
//! Usage: `cargo run --example deck_poll --features hid [-- config.toml]`

use deckreport::backends::hid::open_steam_deck;
use deckreport::{
    Config, EventFilter, InputEventBus, JsonLinesListener, PollSession, TracingLogger,
};
use hidapi::HidApi;
use std::sync::atomic::AtomicBool;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let layout = config.resolve_layout()?;

    let api = HidApi::new()?;
    let (iface, mut source) = open_steam_deck(&api, &config.preference_order)?;
    println!("Connected to {iface}");

    let mut bus = InputEventBus::new();
    bus.add_listener(TracingLogger::new(), EventFilter::ButtonsOnly);
    bus.add_listener(JsonLinesListener::new(std::io::stdout()), EventFilter::All);

    let mut session = PollSession::new(layout, config.thresholds, config.poll.clone());
    let summary = session.run(&mut source, &AtomicBool::new(false), &mut bus);
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
