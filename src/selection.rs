//! Interface selection with ordered fallback.
//!
//! A compliant device exposes two logical interfaces: one takes feature and
//! output reports, one is polled for input. [`select`] walks a preference list
//! (default `[2, 1]`) and tries to bind every candidate matching each
//! preference, in candidate order, until one bind succeeds.
//!
//! Binding itself is delegated to an [`InterfaceBinder`]; this module only
//! defines the order of attempts and when to give up.

use crate::error::{SelectionError, SelectionResult, TransportError};
use crate::metadata::InterfaceDescriptor;
use tracing::{debug, info, warn};

/// Try interface 2 first, then interface 1.
pub const DEFAULT_PREFERENCE_ORDER: [i32; 2] = [2, 1];

/// Opens a candidate interface.
pub trait InterfaceBinder {
    /// Whatever the transport hands back on success (usually an open device).
    type Handle;

    fn bind(&mut self, candidate: &InterfaceDescriptor) -> Result<Self::Handle, TransportError>;
}

impl<H, F> InterfaceBinder for F
where
    F: FnMut(&InterfaceDescriptor) -> Result<H, TransportError>,
{
    type Handle = H;

    fn bind(&mut self, candidate: &InterfaceDescriptor) -> Result<H, TransportError> {
        self(candidate)
    }
}

/// Bind the first candidate that succeeds, by preference then candidate order.
///
/// Duplicate interface numbers are all tried. Returns
/// [`SelectionError::NoSuitableInterface`] once every attempt has failed.
pub fn select<B: InterfaceBinder>(
    candidates: &[InterfaceDescriptor],
    preference_order: &[i32],
    binder: &mut B,
) -> SelectionResult<(InterfaceDescriptor, B::Handle)> {
    let mut tried = 0usize;

    for &wanted in preference_order {
        let mut matched = false;
        for candidate in candidates.iter().filter(|c| c.interface_number == wanted) {
            matched = true;
            tried += 1;
            match binder.bind(candidate) {
                Ok(handle) => {
                    info!(interface = candidate.interface_number, path = %candidate.path, "bound interface");
                    return Ok((candidate.clone(), handle));
                }
                Err(e) => {
                    warn!(interface = candidate.interface_number, path = %candidate.path, error = %e, "bind failed");
                }
            }
        }
        if !matched {
            debug!(interface = wanted, "no candidate for preferred interface");
        }
    }

    Err(SelectionError::NoSuitableInterface { tried })
}
