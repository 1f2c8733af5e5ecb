//! Change detection between consecutive snapshots.
//!
//! [`filter`] compares a freshly decoded [`Snapshot`] with the last one the
//! caller emitted and reports what is worth emitting. The filter keeps no
//! state of its own; the caller threads `previous` through explicitly.
//!
//! ## Rules
//! - **Buttons** changed iff the pressed sets differ. With no previous
//!   snapshot, a non-empty set counts as changed and an empty set does not.
//! - **Analog** changed iff there is no previous snapshot, or any single
//!   stick channel moved by more than `axis_threshold`, or any single trigger
//!   moved by more than `trigger_threshold`. Channels are tested one at a
//!   time; there is no combined magnitude.

use crate::error::{ConfigError, ConfigResult};
use crate::snapshot::{AnalogState, Button, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_AXIS_THRESHOLD: u32 = 1000;
pub const DEFAULT_TRIGGER_THRESHOLD: u32 = 5;

/// Per-channel minimum deltas, in raw units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeThresholds {
    pub axis_threshold: u32,
    pub trigger_threshold: u32,
}

impl Default for ChangeThresholds {
    fn default() -> Self {
        Self {
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
        }
    }
}

impl ChangeThresholds {
    /// Reject thresholds no reading could ever exceed.
    pub fn validate(&self) -> ConfigResult<()> {
        // Largest possible i16 delta is 65535, u8 delta is 255.
        if self.axis_threshold >= u32::from(u16::MAX) {
            return Err(ConfigError::InvalidThreshold(format!(
                "axis_threshold {} suppresses every stick change",
                self.axis_threshold
            )));
        }
        if self.trigger_threshold >= u32::from(u8::MAX) {
            return Err(ConfigError::InvalidThreshold(format!(
                "trigger_threshold {} suppresses every trigger change",
                self.trigger_threshold
            )));
        }
        Ok(())
    }
}

/// What changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub buttons_changed: bool,
    /// Buttons whose state flipped (symmetric difference of the pressed sets).
    pub button_delta: BTreeSet<Button>,
    pub analog_changed: bool,
    /// Present only when `analog_changed` is true.
    pub analog: Option<AnalogState>,
}

impl ChangeReport {
    /// Nothing to emit.
    pub fn is_empty(&self) -> bool {
        !self.buttons_changed && !self.analog_changed
    }

    /// Buttons in the delta that are held in `current`.
    pub fn pressed<'a>(&'a self, current: &'a Snapshot) -> impl Iterator<Item = Button> + 'a {
        self.button_delta
            .iter()
            .copied()
            .filter(move |b| current.is_pressed(*b))
    }

    /// Buttons in the delta that are no longer held in `current`.
    pub fn released<'a>(&'a self, current: &'a Snapshot) -> impl Iterator<Item = Button> + 'a {
        self.button_delta
            .iter()
            .copied()
            .filter(move |b| !current.is_pressed(*b))
    }
}

#[inline]
fn exceeds(previous: i32, current: i32, threshold: u32) -> bool {
    previous.abs_diff(current) > threshold
}

fn analog_moved(previous: &Snapshot, current: &Snapshot, thresholds: &ChangeThresholds) -> bool {
    let sticks = previous
        .sticks
        .channels()
        .into_iter()
        .zip(current.sticks.channels())
        .any(|(p, c)| exceeds(i32::from(p), i32::from(c), thresholds.axis_threshold));

    let (pt, ct) = (previous.triggers, current.triggers);
    let triggers = [(pt.lt, ct.lt), (pt.rt, ct.rt)]
        .into_iter()
        .any(|(p, c)| exceeds(i32::from(p), i32::from(c), thresholds.trigger_threshold));

    sticks || triggers
}

/// Compare `current` against the last emitted snapshot.
pub fn filter(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    thresholds: &ChangeThresholds,
) -> ChangeReport {
    let (buttons_changed, button_delta) = match previous {
        None => (!current.pressed.is_empty(), current.pressed.clone()),
        Some(prev) => {
            let delta: BTreeSet<Button> = prev
                .pressed
                .symmetric_difference(&current.pressed)
                .copied()
                .collect();
            (!delta.is_empty(), delta)
        }
    };

    let analog_changed = match previous {
        None => true,
        Some(prev) => analog_moved(prev, current, thresholds),
    };

    ChangeReport {
        buttons_changed,
        button_delta,
        analog_changed,
        analog: analog_changed.then(|| current.analog()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Sticks, Triggers};

    fn with_buttons(buttons: &[Button]) -> Snapshot {
        Snapshot {
            pressed: buttons.iter().copied().collect(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_first_idle_read() {
        let report = filter(None, &Snapshot::default(), &ChangeThresholds::default());
        assert!(!report.buttons_changed);
        assert!(report.button_delta.is_empty());
        assert!(report.analog_changed);
        assert_eq!(report.analog, Some(AnalogState::default()));
    }

    #[test]
    fn test_first_read_with_button() {
        let report = filter(None, &with_buttons(&[Button::A]), &ChangeThresholds::default());
        assert!(report.buttons_changed);
        assert_eq!(report.button_delta, BTreeSet::from([Button::A]));
    }

    #[test]
    fn test_identical_snapshots() {
        let snap = with_buttons(&[Button::X, Button::L1]);
        let report = filter(Some(&snap), &snap, &ChangeThresholds::default());
        assert!(!report.buttons_changed);
        assert!(!report.analog_changed);
        assert_eq!(report.analog, None);
        assert!(report.is_empty());
    }

    #[test]
    fn test_button_delta_is_symmetric_difference() {
        let prev = with_buttons(&[Button::A, Button::B]);
        let cur = with_buttons(&[Button::B, Button::Y]);
        let report = filter(Some(&prev), &cur, &ChangeThresholds::default());
        assert!(report.buttons_changed);
        assert_eq!(report.button_delta, BTreeSet::from([Button::A, Button::Y]));
        assert_eq!(report.pressed(&cur).collect::<Vec<_>>(), vec![Button::Y]);
        assert_eq!(report.released(&cur).collect::<Vec<_>>(), vec![Button::A]);
    }

    #[test]
    fn test_axis_threshold_boundary() {
        let thresholds = ChangeThresholds::default();
        let prev = Snapshot::default();

        let mut cur = Snapshot::default();
        cur.sticks.lx = 999;
        assert!(!filter(Some(&prev), &cur, &thresholds).analog_changed);

        cur.sticks.lx = 1000;
        assert!(!filter(Some(&prev), &cur, &thresholds).analog_changed);

        cur.sticks.lx = 1001;
        let report = filter(Some(&prev), &cur, &thresholds);
        assert!(report.analog_changed);
        assert_eq!(report.analog.map(|a| a.sticks.lx), Some(1001));
    }

    #[test]
    fn test_per_channel_not_magnitude() {
        let prev = Snapshot::default();
        let cur = Snapshot {
            sticks: Sticks {
                lx: 900,
                ly: 900,
                rx: -900,
                ry: -900,
            },
            ..Snapshot::default()
        };
        // Combined displacement exceeds 1000, each channel does not.
        assert!(!filter(Some(&prev), &cur, &ChangeThresholds::default()).analog_changed);
    }

    #[test]
    fn test_extreme_axis_delta_does_not_overflow() {
        let mut prev = Snapshot::default();
        prev.sticks.ry = i16::MIN;
        let mut cur = Snapshot::default();
        cur.sticks.ry = i16::MAX;
        assert!(filter(Some(&prev), &cur, &ChangeThresholds::default()).analog_changed);
    }

    #[test]
    fn test_trigger_threshold() {
        let thresholds = ChangeThresholds::default();
        let prev = Snapshot {
            triggers: Triggers { lt: 100, rt: 0 },
            ..Snapshot::default()
        };
        let mut cur = prev.clone();
        cur.triggers.lt = 105;
        assert!(!filter(Some(&prev), &cur, &thresholds).analog_changed);
        cur.triggers.lt = 94;
        assert!(filter(Some(&prev), &cur, &thresholds).analog_changed);
    }

    #[test]
    fn test_buttons_and_analog_independent() {
        let prev = Snapshot::default();
        let cur = with_buttons(&[Button::R2]);
        let report = filter(Some(&prev), &cur, &ChangeThresholds::default());
        assert!(report.buttons_changed);
        assert!(!report.analog_changed);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(ChangeThresholds::default().validate().is_ok());
        let t = ChangeThresholds {
            axis_threshold: 70_000,
            trigger_threshold: 5,
        };
        assert!(t.validate().is_err());
        let t = ChangeThresholds {
            axis_threshold: 10,
            trigger_threshold: 255,
        };
        assert!(t.validate().is_err());
    }
}
