//! Report layout tables.
//!
//! A [`ReportLayout`] is the wire format this crate parses: which byte offset
//! and bit mask means which button, where the four stick axes live, and how
//! the two triggers are encoded. Layouts are plain data, versioned, and can be
//! loaded from TOML, so a new firmware variant is a new table rather than a new
//! decoder.
//!
//! ## Built-in tables
//!
//! ### `deck-v2` (default, 64 bytes)
//! | offset | contents                                                       |
//! |--------|----------------------------------------------------------------|
//! | 8      | `0x01` R2, `0x02` L2, `0x04` R1, `0x08` L1                     |
//! | 9      | `0x01` DPad-Up, `0x02` DPad-Right, `0x04` DPad-Left, `0x08` DPad-Down |
//! | 10     | `0x01` A, `0x02` B, `0x04` X, `0x08` Y                         |
//! | 11     | alt byte, each bit reported as `Alt-01` .. `Alt-80`            |
//! | 12..14 | LX (i16 LE)                                                    |
//! | 14..16 | LY (i16 LE)                                                    |
//! | 18..20 | RX (i16 LE)                                                    |
//! | 20..22 | RY (i16 LE)                                                    |
//! | 24..26 | RT (u16 LE, folded)                                            |
//! | 26..28 | LT (u16 LE, folded)                                            |
//!
//! ### `deck-v1` (64 bytes)
//! Pre-remap variant: face buttons on byte 8, bumpers/triggers on byte 10,
//! D-pad bits ordered Up, Down, Left, Right. Sticks and triggers as `deck-v2`.
//!
//! ### `compact` (16 bytes, analog only)
//! Sticks at 4/6/8/10 (i16 LE), LT at 12 and RT at 13 (u8). No buttons.
//!
//! All offsets and masks are calibration data observed on specific firmware;
//! verify against real hardware before relying on a table.

use crate::error::{ConfigError, ConfigResult};
use crate::snapshot::Button;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Valve Corporation USB vendor id.
pub const STEAM_DECK_VID: u16 = 0x28DE;

/// Steam Deck built-in controller product id.
pub const STEAM_DECK_PID: u16 = 0x1205;

/// Canonical (and maximum) input report length.
pub const REPORT_LEN: usize = 64;

/// Smallest minimum length any layout may declare.
pub const MIN_LAYOUT_LEN: usize = 16;

/// One bit of one byte mapped to a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonField {
    pub offset: usize,
    pub mask: u8,
    pub button: Button,
}

impl ButtonField {
    pub const fn new(offset: usize, mask: u8, button: Button) -> Self {
        Self {
            offset,
            mask,
            button,
        }
    }
}

/// Byte offsets of the four little-endian i16 stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickOffsets {
    pub lx: usize,
    pub ly: usize,
    pub rx: usize,
    pub ry: usize,
}

/// How trigger values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerEncoding {
    /// One unsigned byte.
    U8,
    /// Little-endian u16; values above 255 are shifted right by 8.
    U16Folded,
}

impl TriggerEncoding {
    #[inline]
    pub fn width(self) -> usize {
        match self {
            TriggerEncoding::U8 => 1,
            TriggerEncoding::U16Folded => 2,
        }
    }
}

/// Byte offsets and encoding of the two triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerField {
    pub lt: usize,
    pub rt: usize,
    pub encoding: TriggerEncoding,
}

/// Declarative description of one report format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub name: String,
    pub version: u32,
    /// Reports shorter than this are rejected.
    pub min_len: usize,
    #[serde(default)]
    pub buttons: Vec<ButtonField>,
    pub sticks: StickOffsets,
    pub triggers: TriggerField,
}

const DECK_STICKS: StickOffsets = StickOffsets {
    lx: 12,
    ly: 14,
    rx: 18,
    ry: 20,
};

const DECK_TRIGGERS: TriggerField = TriggerField {
    lt: 26,
    rt: 24,
    encoding: TriggerEncoding::U16Folded,
};

const ALT_BUTTONS: [ButtonField; 8] = [
    ButtonField::new(11, 0x01, Button::Alt01),
    ButtonField::new(11, 0x02, Button::Alt02),
    ButtonField::new(11, 0x04, Button::Alt04),
    ButtonField::new(11, 0x08, Button::Alt08),
    ButtonField::new(11, 0x10, Button::Alt10),
    ButtonField::new(11, 0x20, Button::Alt20),
    ButtonField::new(11, 0x40, Button::Alt40),
    ButtonField::new(11, 0x80, Button::Alt80),
];

impl ReportLayout {
    /// Current 64-byte Steam Deck layout.
    pub fn deck_v2() -> Self {
        let mut buttons = vec![
            ButtonField::new(8, 0x01, Button::R2),
            ButtonField::new(8, 0x02, Button::L2),
            ButtonField::new(8, 0x04, Button::R1),
            ButtonField::new(8, 0x08, Button::L1),
            ButtonField::new(9, 0x01, Button::DPadUp),
            ButtonField::new(9, 0x02, Button::DPadRight),
            ButtonField::new(9, 0x04, Button::DPadLeft),
            ButtonField::new(9, 0x08, Button::DPadDown),
            ButtonField::new(10, 0x01, Button::A),
            ButtonField::new(10, 0x02, Button::B),
            ButtonField::new(10, 0x04, Button::X),
            ButtonField::new(10, 0x08, Button::Y),
        ];
        buttons.extend_from_slice(&ALT_BUTTONS);
        Self {
            name: LayoutId::DeckV2.as_str().to_string(),
            version: 2,
            min_len: REPORT_LEN,
            buttons,
            sticks: DECK_STICKS,
            triggers: DECK_TRIGGERS,
        }
    }

    /// Pre-remap 64-byte Steam Deck layout.
    pub fn deck_v1() -> Self {
        let mut buttons = vec![
            ButtonField::new(8, 0x01, Button::A),
            ButtonField::new(8, 0x02, Button::B),
            ButtonField::new(8, 0x04, Button::X),
            ButtonField::new(8, 0x08, Button::Y),
            ButtonField::new(9, 0x01, Button::DPadUp),
            ButtonField::new(9, 0x02, Button::DPadDown),
            ButtonField::new(9, 0x04, Button::DPadLeft),
            ButtonField::new(9, 0x08, Button::DPadRight),
            ButtonField::new(10, 0x01, Button::R2),
            ButtonField::new(10, 0x02, Button::L2),
            ButtonField::new(10, 0x04, Button::R1),
            ButtonField::new(10, 0x08, Button::L1),
        ];
        buttons.extend_from_slice(&ALT_BUTTONS);
        Self {
            name: LayoutId::DeckV1.as_str().to_string(),
            version: 1,
            min_len: REPORT_LEN,
            buttons,
            sticks: DECK_STICKS,
            triggers: DECK_TRIGGERS,
        }
    }

    /// 16-byte analog-only layout.
    pub fn compact() -> Self {
        Self {
            name: LayoutId::Compact.as_str().to_string(),
            version: 1,
            min_len: MIN_LAYOUT_LEN,
            buttons: Vec::new(),
            sticks: StickOffsets {
                lx: 4,
                ly: 6,
                rx: 8,
                ry: 10,
            },
            triggers: TriggerField {
                lt: 12,
                rt: 13,
                encoding: TriggerEncoding::U8,
            },
        }
    }

    /// Every button this layout can report, in table order.
    pub fn declared_buttons(&self) -> impl Iterator<Item = Button> + '_ {
        self.buttons.iter().map(|f| f.button)
    }

    /// Check that every field fits inside `min_len` and that button entries are sane.
    ///
    /// A layout that passes can never cause an out-of-range read on a buffer of
    /// at least `min_len` bytes.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: String| ConfigError::InvalidLayout {
            name: self.name.clone(),
            reason,
        };

        if self.min_len < MIN_LAYOUT_LEN || self.min_len > REPORT_LEN {
            return Err(invalid(format!(
                "min_len {} outside {}..={}",
                self.min_len, MIN_LAYOUT_LEN, REPORT_LEN
            )));
        }

        let fits = |offset: usize, width: usize| {
            offset
                .checked_add(width)
                .is_some_and(|end| end <= self.min_len)
        };

        let mut seen = HashSet::new();
        for field in &self.buttons {
            if field.mask == 0 {
                return Err(invalid(format!("{} has an empty mask", field.button)));
            }
            if !fits(field.offset, 1) {
                return Err(invalid(format!(
                    "{} at offset {} is past min_len",
                    field.button, field.offset
                )));
            }
            if !seen.insert(field.button) {
                return Err(invalid(format!("{} is declared twice", field.button)));
            }
        }

        let s = &self.sticks;
        for (axis, offset) in [("lx", s.lx), ("ly", s.ly), ("rx", s.rx), ("ry", s.ry)] {
            if !fits(offset, 2) {
                return Err(invalid(format!("{axis} at offset {offset} is past min_len")));
            }
        }

        let t = &self.triggers;
        let width = t.encoding.width();
        for (trigger, offset) in [("lt", t.lt), ("rt", t.rt)] {
            if !fits(offset, width) {
                return Err(invalid(format!(
                    "{trigger} at offset {offset} is past min_len"
                )));
            }
        }

        Ok(())
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::deck_v2()
    }
}

/// Identifier of a built-in layout table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutId {
    #[default]
    DeckV2,
    DeckV1,
    Compact,
}

impl LayoutId {
    pub const ALL: [LayoutId; 3] = [LayoutId::DeckV2, LayoutId::DeckV1, LayoutId::Compact];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutId::DeckV2 => "deck-v2",
            LayoutId::DeckV1 => "deck-v1",
            LayoutId::Compact => "compact",
        }
    }

    pub fn layout(self) -> ReportLayout {
        match self {
            LayoutId::DeckV2 => ReportLayout::deck_v2(),
            LayoutId::DeckV1 => ReportLayout::deck_v1(),
            LayoutId::Compact => ReportLayout::compact(),
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownLayout(s.to_string()))
    }
}
