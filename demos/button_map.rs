//! Print the raw button bytes whenever they change.
//!
//! Press one control at a time and watch which byte and bit move; useful when
//! calibrating a new layout table.

use deckreport::backends::hid::open_steam_deck;
use deckreport::{ReportSource, DEFAULT_PREFERENCE_ORDER, REPORT_LEN};
use hidapi::HidApi;
use std::time::Duration;

/// Offsets of the trigger/bumper, D-pad, face and alt button bytes.
const BUTTON_BYTES: std::ops::RangeInclusive<usize> = 8..=11;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let api = HidApi::new()?;
    let (iface, mut source) = open_steam_deck(&api, &DEFAULT_PREFERENCE_ORDER)?;
    println!("Connected to {iface}");
    if let Err(e) = source.prepare() {
        eprintln!("prepare failed: {e}");
    }

    let mut buf = [0u8; REPORT_LEN];
    let mut last: Option<Vec<u8>> = None;
    for _ in 0..5000 {
        let n = source.read_report(&mut buf, 200)?;
        if let Some(bytes) = buf.get(..n).and_then(|b| b.get(BUTTON_BYTES)) {
            if last.as_deref() != Some(bytes) {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
                println!("triggers/dpad/abxy/alt: {}", hex.join(" "));
                last = Some(bytes.to_vec());
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    Ok(())
}
