//! Events derived from change reports.
//!
//! A [`ChangeReport`] says *what* changed between two snapshots. Consumers that
//! prefer an event stream can flatten it into [`InputKind`] deltas: one
//! press/release per button in the delta, plus one analog event when the
//! analog half moved past its thresholds.
//!
//! ## Value conventions
//! - **Buttons:** press/release edges named by [`Button`].
//! - **Analog:** raw stick and trigger values, see [`AnalogState`]. Normalize
//!   with [`Sticks::normalized`](crate::snapshot::Sticks::normalized) when needed.

use crate::filter::ChangeReport;
use crate::snapshot::{AnalogState, Button, Snapshot};
use serde::Serialize;
use std::time::Instant;

/// Input change (delta).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// A button transitioned to pressed.
    ButtonPressed { button: Button },

    /// A button transitioned to released.
    ButtonReleased { button: Button },

    /// Sticks or triggers moved past their thresholds.
    AnalogChanged { analog: AnalogState },
}

impl InputKind {
    #[inline]
    pub fn is_button(&self) -> bool {
        matches!(
            self,
            InputKind::ButtonPressed { .. } | InputKind::ButtonReleased { .. }
        )
    }

    #[inline]
    pub fn is_analog(&self) -> bool {
        matches!(self, InputKind::AnalogChanged { .. })
    }
}

/// Timestamped input event.
#[derive(Clone, Debug)]
pub struct InputEvent {
    /// Capture time (monotonic). Suitable for ordering / delta timing within a run.
    pub at: Instant,
    pub kind: InputKind,
}

impl InputEvent {
    /// Flatten a report into events, buttons first (in button order), analog last.
    ///
    /// `current` is the snapshot the report was computed for; it decides whether
    /// each delta button was pressed or released.
    pub fn from_report(report: &ChangeReport, current: &Snapshot, at: Instant) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(report.button_delta.len() + 1);

        for &button in &report.button_delta {
            let kind = if current.is_pressed(button) {
                InputKind::ButtonPressed { button }
            } else {
                InputKind::ButtonReleased { button }
            };
            events.push(InputEvent { at, kind });
        }

        if let Some(analog) = report.analog {
            events.push(InputEvent {
                at,
                kind: InputKind::AnalogChanged { analog },
            });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, ChangeThresholds};

    #[test]
    fn test_from_report_orders_buttons_then_analog() {
        let prev = Snapshot {
            pressed: [Button::A].into_iter().collect(),
            ..Snapshot::default()
        };
        let mut cur = Snapshot {
            pressed: [Button::B].into_iter().collect(),
            ..Snapshot::default()
        };
        cur.sticks.rx = 5000;

        let report = filter(Some(&prev), &cur, &ChangeThresholds::default());
        let kinds: Vec<InputKind> = InputEvent::from_report(&report, &cur, Instant::now())
            .into_iter()
            .map(|e| e.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                InputKind::ButtonReleased { button: Button::A },
                InputKind::ButtonPressed { button: Button::B },
                InputKind::AnalogChanged {
                    analog: cur.analog()
                },
            ]
        );
    }

    #[test]
    fn test_empty_report_has_no_events() {
        let snap = Snapshot::default();
        let report = filter(Some(&snap), &snap, &ChangeThresholds::default());
        assert!(InputEvent::from_report(&report, &snap, Instant::now()).is_empty());
    }

    #[test]
    fn test_kind_serializes_tagged() {
        let json = serde_json::to_value(InputKind::ButtonPressed {
            button: Button::DPadUp,
        })
        .expect("serialize");
        assert_eq!(json["kind"], "button_pressed");
        assert_eq!(json["button"], "DPad-Up");
    }
}
