//! Drive a PollSession from a scripted source, no hardware needed.

use deckreport::backends::ScriptedSource;
use deckreport::{
    Button, Config, EventFilter, InputEventBus, JsonLinesListener, PollSession, Snapshot,
};
use std::sync::atomic::AtomicBool;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut config = Config::from_toml_str(
        r#"
        [poll]
        interval_ms = 0
        max_polls = 6
        "#,
    )?;
    config.poll.reassert_feature_reports = false;
    let layout = config.resolve_layout()?;

    let mut source = ScriptedSource::new("scripted:0");
    let mut snap = Snapshot::default();
    source.feed_snapshot(&snap, &layout);
    snap.pressed.insert(Button::A);
    source.feed_snapshot(&snap, &layout);
    snap.sticks.lx = 400;
    source.feed_snapshot(&snap, &layout);
    snap.sticks.lx = -20000;
    snap.triggers.rt = 128;
    source.feed_snapshot(&snap, &layout);
    snap.pressed.clear();
    source.feed_snapshot(&snap, &layout).feed_idle();

    let mut bus = InputEventBus::new();
    bus.add_listener(JsonLinesListener::new(std::io::stdout()), EventFilter::All);

    let mut session = PollSession::new(layout, config.thresholds, config.poll.clone());
    let summary = session.run(&mut source, &AtomicBool::new(false), &mut bus);
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
