//! Decoded controller state for one report.
//!
//! [`Snapshot`] is an **owned**, read-only view of one decoded report. Every
//! call to [`decode`](crate::decoder::decode) produces a fresh value; nothing in
//! this crate mutates a snapshot after construction.
//!
//! # Value conventions
//! - **Sticks:** raw signed 16-bit values, full `i16` range, no clamping.
//!   [`Sticks::normalized`] maps them to roughly `[-1.0, 1.0]`.
//! - **Triggers:** unsigned `0..=255`.
//! - **Buttons:** the set of pressed [`Button`]s, ordered by declaration.
//!
//! # Examples
//! ```
//! use deckreport::{decode, ReportLayout};
//!
//! let layout = ReportLayout::deck_v2();
//! let snap = decode(&[0u8; 64], &layout).unwrap();
//! assert!(snap.pressed.is_empty());
//! assert_eq!(snap.sticks.normalized().lx, 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Named controls a layout can map a bit to.
///
/// The serialized form matches [`Button::name`], so layout tables in TOML read
/// `button = "DPad-Up"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Button {
    R2,
    L2,
    R1,
    L1,
    #[serde(rename = "DPad-Up")]
    DPadUp,
    #[serde(rename = "DPad-Right")]
    DPadRight,
    #[serde(rename = "DPad-Left")]
    DPadLeft,
    #[serde(rename = "DPad-Down")]
    DPadDown,
    A,
    B,
    X,
    Y,
    #[serde(rename = "Alt-01")]
    Alt01,
    #[serde(rename = "Alt-02")]
    Alt02,
    #[serde(rename = "Alt-04")]
    Alt04,
    #[serde(rename = "Alt-08")]
    Alt08,
    #[serde(rename = "Alt-10")]
    Alt10,
    #[serde(rename = "Alt-20")]
    Alt20,
    #[serde(rename = "Alt-40")]
    Alt40,
    #[serde(rename = "Alt-80")]
    Alt80,
}

impl Button {
    /// Every button, in declaration order.
    pub const ALL: [Button; 20] = [
        Button::R2,
        Button::L2,
        Button::R1,
        Button::L1,
        Button::DPadUp,
        Button::DPadRight,
        Button::DPadLeft,
        Button::DPadDown,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Alt01,
        Button::Alt02,
        Button::Alt04,
        Button::Alt08,
        Button::Alt10,
        Button::Alt20,
        Button::Alt40,
        Button::Alt80,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Button::R2 => "R2",
            Button::L2 => "L2",
            Button::R1 => "R1",
            Button::L1 => "L1",
            Button::DPadUp => "DPad-Up",
            Button::DPadRight => "DPad-Right",
            Button::DPadLeft => "DPad-Left",
            Button::DPadDown => "DPad-Down",
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::Alt01 => "Alt-01",
            Button::Alt02 => "Alt-02",
            Button::Alt04 => "Alt-04",
            Button::Alt08 => "Alt-08",
            Button::Alt10 => "Alt-10",
            Button::Alt20 => "Alt-20",
            Button::Alt40 => "Alt-40",
            Button::Alt80 => "Alt-80",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw stick axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sticks {
    pub lx: i16,
    pub ly: i16,
    pub rx: i16,
    pub ry: i16,
}

/// Stick axes mapped to floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedSticks {
    pub lx: f32,
    pub ly: f32,
    pub rx: f32,
    pub ry: f32,
}

impl Sticks {
    /// Channel values in `lx, ly, rx, ry` order.
    #[inline]
    pub fn channels(&self) -> [i16; 4] {
        [self.lx, self.ly, self.rx, self.ry]
    }

    pub fn normalized(&self) -> NormalizedSticks {
        NormalizedSticks {
            lx: normalize_axis(self.lx),
            ly: normalize_axis(self.ly),
            rx: normalize_axis(self.rx),
            ry: normalize_axis(self.ry),
        }
    }
}

/// Map a raw axis to a float as `raw / 32768.0`.
///
/// Raw `0` short-circuits to exactly `0.0` (centered). Some firmware variants
/// report an unsigned midpoint instead; that calibration is not applied here.
#[inline]
pub fn normalize_axis(raw: i16) -> f32 {
    if raw == 0 {
        0.0
    } else {
        f32::from(raw) / 32768.0
    }
}

/// Trigger pull, `0..=255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triggers {
    pub lt: u8,
    pub rt: u8,
}

/// Analog half of a snapshot: what the change filter reports when analog input moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalogState {
    pub sticks: Sticks,
    pub triggers: Triggers,
}

/// Decoded state of one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Buttons currently held. Only names declared by the decoding layout appear here.
    pub pressed: BTreeSet<Button>,
    pub sticks: Sticks,
    pub triggers: Triggers,
}

impl Snapshot {
    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    #[inline]
    pub fn analog(&self) -> AnalogState {
        AnalogState {
            sticks: self.sticks,
            triggers: self.triggers,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.sticks.normalized();
        write!(f, "[")?;
        for (i, b) in self.pressed.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{b}")?;
        }
        write!(
            f,
            "] L=({:.2},{:.2}) R=({:.2},{:.2}) LT={} RT={}",
            n.lx, n.ly, n.rx, n.ry, self.triggers.lt, self.triggers.rt
        )
    }
}
