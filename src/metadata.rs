//! Interface metadata.
//!
//! [`InterfaceDescriptor`] describes one logical sub-interface of a physical
//! device, as reported by a transport. The selection policy only looks at
//! `interface_number`; the rest is carried for logging and diagnostics.
//!
//! # Conventions
//! - `path` is an OS/topology path (opaque string). It is what a binder opens.
//! - `interface_number` follows the platform value; some stacks use `-1` for
//!   "not applicable", which never matches a preference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate interface offered by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Platform-reported interface index (`MI_xx` on Windows).
    pub interface_number: i32,

    /// Opaque path handed back to the transport when binding.
    pub path: String,

    /// USB Vendor ID, if known.
    #[serde(default)]
    pub vendor_id: Option<u16>,

    /// USB Product ID, if known.
    #[serde(default)]
    pub product_id: Option<u16>,

    /// Human-readable product name from the driver/firmware.
    #[serde(default)]
    pub product_string: Option<String>,
}

impl InterfaceDescriptor {
    pub fn new(interface_number: i32, path: impl Into<String>) -> Self {
        Self {
            interface_number,
            path: path.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {} ({})", self.interface_number, self.path)
    }
}
