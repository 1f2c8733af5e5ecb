//! deckreport: report decoding and change detection for Steam Deck class controllers.
//!
//! Turns fixed-size raw HID input reports into typed [`Snapshot`]s using a
//! declarative [`ReportLayout`], and decides per poll what actually changed
//! with per-channel thresholds ([`filter()`]). A small selection policy
//! ([`select()`]) picks which interface of the device to bind to.
//!
//! The decoder and filter are pure functions; [`PollSession`] is the optional
//! driver that threads state between polls and publishes [`InputEvent`]s.
//!
//! ```
//! use deckreport::{decode, filter, Button, ChangeThresholds, ReportLayout};
//!
//! let layout = ReportLayout::deck_v2();
//! let mut raw = [0u8; 64];
//! raw[10] = 0x01; // A
//!
//! let snap = decode(&raw, &layout).unwrap();
//! let report = filter(None, &snap, &ChangeThresholds::default());
//! assert!(report.buttons_changed);
//! assert!(report.button_delta.contains(&Button::A));
//! ```

pub mod backends;
pub mod config;
pub mod decoder;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filter;
pub mod layout;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod selection;
pub mod snapshot;

pub use config::*;
pub use decoder::{decode, encode};
pub use device::*;
pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use filter::*;
pub use layout::*;
pub use logger::*;
pub use manager::*;
pub use metadata::*;
pub use selection::*;
pub use snapshot::*;
