//! Report sources for `deckreport`.
//!
//! Implementations of [`ReportSource`](crate::device::ReportSource) for
//! concrete transports.
//!
//! # Feature flags
//! - **`hid`**: enables the hidapi transport ([`hid`]).
//!
//! [`virtual_input`] is always available and replays scripted reports, for
//! tests and demos without hardware.

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

pub mod virtual_input;

pub use virtual_input::ScriptedSource;
