//! Ready-made listeners.
//!
//! - [`TracingLogger`] forwards every event to `tracing` at `info` level.
//! - [`JsonLinesListener`] writes one JSON object per event to any writer.

use crate::event::{InputEvent, InputKind};
use crate::eventbus::InputListener;
use std::io::Write;
use tracing::{info, warn};

/// Logs every input event through `tracing`.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        TracingLogger
    }
}

impl InputListener for TracingLogger {
    fn on_input(&mut self, event: &InputEvent) {
        match &event.kind {
            InputKind::ButtonPressed { button } => info!(%button, "pressed"),
            InputKind::ButtonReleased { button } => info!(%button, "released"),
            InputKind::AnalogChanged { analog } => {
                let n = analog.sticks.normalized();
                info!(
                    lx = n.lx,
                    ly = n.ly,
                    rx = n.rx,
                    ry = n.ry,
                    lt = analog.triggers.lt,
                    rt = analog.triggers.rt,
                    "analog"
                );
            }
        }
    }
}

/// Writes each event's [`InputKind`] as a line of JSON.
///
/// Write failures are logged and the event is dropped.
pub struct JsonLinesListener<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &InputEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, &event.kind)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write + Send> InputListener for JsonLinesListener<W> {
    fn on_input(&mut self, event: &InputEvent) {
        if let Err(e) = self.write_event(event) {
            warn!(error = %e, "failed to write event");
        }
    }
}
