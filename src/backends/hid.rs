//! hidapi transport.
//!
//! Enumerates the interfaces of a HID device as [`InterfaceDescriptor`]s,
//! opens them through [`HidBinder`] and reads reports through
//! [`HidReportSource`].
//!
//! The Steam Deck controller starts in "lizard mode" (emulating keyboard and
//! mouse). [`HidReportSource::prepare`] sends the feature reports that turn
//! that off and asks for the gamepad input report.

use crate::device::ReportSource;
use crate::error::{SelectionResult, TransportError};
use crate::layout::{REPORT_LEN, STEAM_DECK_PID, STEAM_DECK_VID};
use crate::metadata::InterfaceDescriptor;
use crate::selection::{select, InterfaceBinder};
use hidapi::{HidApi, HidDevice};
use std::ffi::CString;
use tracing::{debug, info};

/// Feature reports that disable lizard mode: clear mappings, then default settings.
pub const DISABLE_LIZARD_MODE: [[u8; 2]; 2] = [[0x87, 0x00], [0x81, 0x00]];

/// First payload byte of the output report that requests gamepad reports.
pub const GAMEPAD_REPORT_REQUEST: u8 = 0x01;

/// List every interface of `vid:pid` that hidapi can see.
pub fn enumerate(api: &HidApi, vid: u16, pid: u16) -> Vec<InterfaceDescriptor> {
    let found: Vec<InterfaceDescriptor> = api
        .device_list()
        .filter(|info| info.vendor_id() == vid && info.product_id() == pid)
        .map(|info| InterfaceDescriptor {
            interface_number: info.interface_number(),
            path: info.path().to_string_lossy().to_string(),
            vendor_id: Some(info.vendor_id()),
            product_id: Some(info.product_id()),
            product_string: info.product_string().map(|s| s.to_string()),
        })
        .collect();
    debug!(vid, pid, count = found.len(), "enumerated interfaces");
    found
}

/// Opens interfaces by path.
pub struct HidBinder<'a> {
    api: &'a HidApi,
}

impl<'a> HidBinder<'a> {
    pub fn new(api: &'a HidApi) -> Self {
        Self { api }
    }
}

impl InterfaceBinder for HidBinder<'_> {
    type Handle = HidReportSource;

    fn bind(&mut self, candidate: &InterfaceDescriptor) -> Result<HidReportSource, TransportError> {
        let open_error = |reason: String| TransportError::Open {
            path: candidate.path.clone(),
            reason,
        };
        let path = CString::new(candidate.path.as_str()).map_err(|e| open_error(e.to_string()))?;
        let device = self
            .api
            .open_path(&path)
            .map_err(|e| open_error(e.to_string()))?;
        Ok(HidReportSource {
            name: format!("hid:{}", candidate.interface_number),
            device,
        })
    }
}

/// Enumerate the Steam Deck controller and bind by `preference_order`.
pub fn open_steam_deck(
    api: &HidApi,
    preference_order: &[i32],
) -> SelectionResult<(InterfaceDescriptor, HidReportSource)> {
    let candidates = enumerate(api, STEAM_DECK_VID, STEAM_DECK_PID);
    select(&candidates, preference_order, &mut HidBinder::new(api))
}

/// An open hidapi device used as a [`ReportSource`].
pub struct HidReportSource {
    name: String,
    device: HidDevice,
}

impl HidReportSource {
    fn disable_lizard_mode(&self) -> Result<(), TransportError> {
        for report in DISABLE_LIZARD_MODE {
            self.device
                .send_feature_report(&report)
                .map_err(|e| TransportError::Write(e.to_string()))?;
        }
        Ok(())
    }

    pub fn device(&self) -> &HidDevice {
        &self.device
    }
}

impl ReportSource for HidReportSource {
    fn prepare(&mut self) -> Result<(), TransportError> {
        self.disable_lizard_mode()?;

        // Leading 0x00 is the report id for devices without numbered reports.
        let mut request = [0u8; REPORT_LEN + 1];
        if let Some(b) = request.get_mut(1) {
            *b = GAMEPAD_REPORT_REQUEST;
        }
        self.device
            .write(&request)
            .map_err(|e| TransportError::Write(e.to_string()))?;

        self.device
            .set_blocking_mode(false)
            .map_err(|e| TransportError::Write(e.to_string()))?;

        info!(source = %self.name, "lizard mode disabled, gamepad report requested");
        Ok(())
    }

    fn before_read(&mut self) -> Result<(), TransportError> {
        self.disable_lizard_mode()
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        let n = self
            .device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| TransportError::Read(e.to_string()))?;

        #[cfg(feature = "debug-log")]
        tracing::trace!(source = %self.name, n, bytes = ?buf.get(..n), "raw read");

        Ok(n)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
