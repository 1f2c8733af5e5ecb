//! Polling driver.
//!
//! [`PollSession`] is the glue between a [`ReportSource`] and consumers: it
//! decodes each report, runs the change filter against the last emitted
//! state, and publishes non-empty changes on an [`InputEventBus`].
//!
//! The decoder and filter stay pure; this is the one place that owns
//! "previous" state, and it owns it explicitly.
//!
//! ## Loop policy
//! - A read returning `Ok(0)` is "no data" and resets nothing.
//! - A decode failure skips the cycle.
//! - `max_consecutive_errors` hard read errors in a row stop the loop.
//! - The stop flag is checked once per cycle.

use crate::config::PollSettings;
use crate::decoder::decode;
use crate::device::ReportSource;
use crate::error::DecodeResult;
use crate::event::InputEvent;
use crate::eventbus::InputEventBus;
use crate::filter::{filter, ChangeReport, ChangeThresholds};
use crate::layout::{ReportLayout, REPORT_LEN};
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// A change worth emitting, with the snapshot it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub report: ChangeReport,
    pub snapshot: Snapshot,
}

/// Why [`PollSession::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The stop flag was raised.
    Stopped,
    /// `max_polls` was reached.
    PollLimit,
    /// Too many hard read errors in a row.
    TooManyErrors,
}

/// Counters for one [`PollSession::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub polls: u64,
    pub emitted: u64,
    pub decode_errors: u64,
    pub read_errors: u64,
    pub stopped_by: StopReason,
}

/// Threads emitted state between decode/filter calls.
pub struct PollSession {
    layout: ReportLayout,
    thresholds: ChangeThresholds,
    settings: PollSettings,
    previous: Option<Snapshot>,
}

impl PollSession {
    pub fn new(layout: ReportLayout, thresholds: ChangeThresholds, settings: PollSettings) -> Self {
        Self {
            layout,
            thresholds,
            settings,
            previous: None,
        }
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// The last emitted state, if anything has been emitted yet.
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Forget emitted state; the next report is treated as the first.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Decode and filter one report.
    ///
    /// Returns `Ok(None)` when nothing changed enough to emit. Emitted state is
    /// tracked per group: the analog baseline only moves when analog input was
    /// emitted, so slow drift still accumulates toward the threshold.
    pub fn process(&mut self, raw: &[u8]) -> DecodeResult<Option<Emission>> {
        let current = decode(raw, &self.layout)?;
        let report = filter(self.previous.as_ref(), &current, &self.thresholds);

        if report.is_empty() {
            return Ok(None);
        }

        let baseline = match (&self.previous, report.analog_changed) {
            (Some(prev), false) => Snapshot {
                pressed: current.pressed.clone(),
                sticks: prev.sticks,
                triggers: prev.triggers,
            },
            _ => current.clone(),
        };
        self.previous = Some(baseline);

        Ok(Some(Emission {
            report,
            snapshot: current,
        }))
    }

    /// Poll `source` until stopped, publishing every emission on `bus`.
    pub fn run<S: ReportSource + ?Sized>(
        &mut self,
        source: &mut S,
        stop: &AtomicBool,
        bus: &mut InputEventBus,
    ) -> RunSummary {
        let mut summary = RunSummary {
            polls: 0,
            emitted: 0,
            decode_errors: 0,
            read_errors: 0,
            stopped_by: StopReason::Stopped,
        };

        if let Err(e) = source.prepare() {
            warn!(source = source.name(), error = %e, "device preparation failed; continuing");
        }

        let mut buf = vec![0u8; REPORT_LEN];
        let mut consecutive_errors = 0u32;
        let interval = Duration::from_millis(self.settings.interval_ms);

        info!(source = source.name(), layout = %self.layout.name, "polling started");

        loop {
            if stop.load(Ordering::Relaxed) {
                summary.stopped_by = StopReason::Stopped;
                break;
            }
            if self
                .settings
                .max_polls
                .is_some_and(|max| summary.polls >= max)
            {
                summary.stopped_by = StopReason::PollLimit;
                break;
            }
            summary.polls += 1;

            if self.settings.reassert_feature_reports {
                if let Err(e) = source.before_read() {
                    debug!(source = source.name(), error = %e, "mode re-assert failed");
                }
            }

            match source.read_report(&mut buf, self.settings.read_timeout_ms) {
                Ok(0) => {
                    consecutive_errors = 0;
                    debug!(source = source.name(), "no data");
                }
                Ok(n) => {
                    consecutive_errors = 0;
                    let raw = buf.get(..n).unwrap_or(&buf[..]);
                    match self.process(raw) {
                        Ok(Some(emission)) => {
                            summary.emitted += 1;
                            debug!(snapshot = %emission.snapshot, "change");
                            let events = InputEvent::from_report(
                                &emission.report,
                                &emission.snapshot,
                                Instant::now(),
                            );
                            bus.emit_all(&events);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            summary.decode_errors += 1;
                            debug!(source = source.name(), error = %e, "skipping report");
                        }
                    }
                }
                Err(e) => {
                    summary.read_errors += 1;
                    consecutive_errors += 1;
                    warn!(source = source.name(), error = %e, consecutive = consecutive_errors, "read error");
                    if consecutive_errors >= self.settings.max_consecutive_errors {
                        error!(source = source.name(), "too many consecutive read errors; stopping");
                        summary.stopped_by = StopReason::TooManyErrors;
                        break;
                    }
                }
            }

            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }

        info!(
            source = source.name(),
            polls = summary.polls,
            emitted = summary.emitted,
            stopped_by = ?summary.stopped_by,
            "polling stopped"
        );
        summary
    }
}
