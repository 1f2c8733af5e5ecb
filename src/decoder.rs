//! Report decoding.
//!
//! [`decode`] turns one raw report into a [`Snapshot`] using a [`ReportLayout`].
//! It is a pure function: no state, no I/O, safe to call from any number of
//! threads at once. The same bytes and layout always give the same snapshot.
//!
//! All reads go through [`ReportReader`], which bounds-checks every access, so
//! a short or malformed buffer yields [`DecodeError::TooShort`] instead of a panic.

use crate::error::{DecodeError, DecodeResult};
use crate::layout::{ReportLayout, TriggerEncoding};
use crate::snapshot::{Snapshot, Sticks, Triggers};
use std::collections::BTreeSet;

/// Bounds-checked little-endian reads at absolute offsets into a borrowed report.
#[derive(Debug, Clone, Copy)]
pub struct ReportReader<'a> {
    data: &'a [u8],
    expected: usize,
}

impl<'a> ReportReader<'a> {
    /// `expected` is the length reported in errors (usually the layout minimum).
    pub fn new(data: &'a [u8], expected: usize) -> Self {
        Self { data, expected }
    }

    #[inline]
    fn too_short(&self) -> DecodeError {
        DecodeError::TooShort {
            expected: self.expected,
            actual: self.data.len(),
        }
    }

    pub fn read_u8(&self, offset: usize) -> DecodeResult<u8> {
        self.data.get(offset).copied().ok_or_else(|| self.too_short())
    }

    pub fn read_u16_le(&self, offset: usize) -> DecodeResult<u16> {
        let end = offset.checked_add(2).ok_or_else(|| self.too_short())?;
        match self.data.get(offset..end) {
            Some(&[lo, hi]) => Ok(u16::from_le_bytes([lo, hi])),
            _ => Err(self.too_short()),
        }
    }

    pub fn read_i16_le(&self, offset: usize) -> DecodeResult<i16> {
        Ok(i16::from_le_bytes(self.read_u16_le(offset)?.to_le_bytes()))
    }

    /// Test `mask` against the byte at `offset`.
    pub fn bit(&self, offset: usize, mask: u8) -> DecodeResult<bool> {
        Ok(self.read_u8(offset)? & mask != 0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Fold a 16-bit trigger reading into byte range.
///
/// Values above 255 keep only their high byte.
#[inline]
pub fn fold_trigger(raw: u16) -> u8 {
    let [lo, hi] = raw.to_le_bytes();
    if raw > 0xFF {
        hi
    } else {
        lo
    }
}

fn read_trigger(reader: &ReportReader<'_>, offset: usize, encoding: TriggerEncoding) -> DecodeResult<u8> {
    match encoding {
        TriggerEncoding::U8 => reader.read_u8(offset),
        TriggerEncoding::U16Folded => Ok(fold_trigger(reader.read_u16_le(offset)?)),
    }
}

/// Decode one raw report.
///
/// Fails with [`DecodeError::TooShort`] if `raw` is shorter than `layout.min_len`.
/// Bytes past the minimum are ignored.
pub fn decode(raw: &[u8], layout: &ReportLayout) -> DecodeResult<Snapshot> {
    if raw.len() < layout.min_len {
        return Err(DecodeError::TooShort {
            expected: layout.min_len,
            actual: raw.len(),
        });
    }
    let reader = ReportReader::new(raw, layout.min_len);

    let mut pressed = BTreeSet::new();
    for field in &layout.buttons {
        if reader.bit(field.offset, field.mask)? {
            pressed.insert(field.button);
        }
    }

    let s = &layout.sticks;
    let sticks = Sticks {
        lx: reader.read_i16_le(s.lx)?,
        ly: reader.read_i16_le(s.ly)?,
        rx: reader.read_i16_le(s.rx)?,
        ry: reader.read_i16_le(s.ry)?,
    };

    let t = &layout.triggers;
    let triggers = Triggers {
        lt: read_trigger(&reader, t.lt, t.encoding)?,
        rt: read_trigger(&reader, t.rt, t.encoding)?,
    };

    #[cfg(feature = "debug-log")]
    tracing::trace!(layout = %layout.name, pressed = pressed.len(), ?sticks, ?triggers, "decoded report");

    Ok(Snapshot {
        pressed,
        sticks,
        triggers,
    })
}

/// Build a zero-padded report of `layout.min_len` bytes that decodes to `snapshot`.
///
/// Buttons not declared by the layout are dropped. Intended for tests and
/// scripted sources.
pub fn encode(snapshot: &Snapshot, layout: &ReportLayout) -> Vec<u8> {
    let mut buf = vec![0u8; layout.min_len];

    for field in &layout.buttons {
        if snapshot.is_pressed(field.button) {
            if let Some(byte) = buf.get_mut(field.offset) {
                *byte |= field.mask;
            }
        }
    }

    let s = &layout.sticks;
    let sticks = &snapshot.sticks;
    for (offset, value) in [(s.lx, sticks.lx), (s.ly, sticks.ly), (s.rx, sticks.rx), (s.ry, sticks.ry)] {
        write_bytes(&mut buf, offset, &value.to_le_bytes());
    }

    let t = &layout.triggers;
    for (offset, value) in [(t.lt, snapshot.triggers.lt), (t.rt, snapshot.triggers.rt)] {
        match t.encoding {
            TriggerEncoding::U8 => write_bytes(&mut buf, offset, &[value]),
            TriggerEncoding::U16Folded => {
                write_bytes(&mut buf, offset, &u16::from(value).to_le_bytes())
            }
        }
    }

    buf
}

fn write_bytes(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    let Some(end) = offset.checked_add(bytes.len()) else {
        return;
    };
    if let Some(dst) = buf.get_mut(offset..end) {
        dst.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Button;

    fn deck_report() -> [u8; 64] {
        [0u8; 64]
    }

    #[test]
    fn test_decode_idle_report() {
        let snap = decode(&deck_report(), &ReportLayout::deck_v2()).expect("decode idle");
        assert!(snap.pressed.is_empty());
        assert_eq!(snap.sticks, Sticks::default());
        assert_eq!(snap.triggers, Triggers::default());
    }

    #[test]
    fn test_decode_too_short() {
        let result = decode(&[0u8; 63], &ReportLayout::deck_v2());
        assert_eq!(
            result,
            Err(DecodeError::TooShort {
                expected: 64,
                actual: 63
            })
        );
        assert!(decode(&[], &ReportLayout::compact()).is_err());
    }

    #[test]
    fn test_trigger_byte_bit_zero_is_r2() {
        let mut data = deck_report();
        data[8] = 0b0000_0001;
        let snap = decode(&data, &ReportLayout::deck_v2()).expect("decode");
        assert_eq!(snap.pressed, BTreeSet::from([Button::R2]));
    }

    #[test]
    fn test_shared_byte_buttons() {
        let mut data = deck_report();
        data[10] = 0x01 | 0x08;
        data[9] = 0x04;
        let snap = decode(&data, &ReportLayout::deck_v2()).expect("decode");
        assert_eq!(
            snap.pressed,
            BTreeSet::from([Button::A, Button::Y, Button::DPadLeft])
        );
    }

    #[test]
    fn test_alt_byte_bits() {
        let mut data = deck_report();
        data[11] = 0x81;
        let snap = decode(&data, &ReportLayout::deck_v2()).expect("decode");
        assert_eq!(snap.pressed, BTreeSet::from([Button::Alt01, Button::Alt80]));
    }

    #[test]
    fn test_sticks_little_endian_signed() {
        let mut data = deck_report();
        data[12..14].copy_from_slice(&(-1234i16).to_le_bytes());
        data[14..16].copy_from_slice(&i16::MAX.to_le_bytes());
        data[18..20].copy_from_slice(&i16::MIN.to_le_bytes());
        data[20] = 0x01;
        data[21] = 0x02;
        let snap = decode(&data, &ReportLayout::deck_v2()).expect("decode");
        assert_eq!(snap.sticks.lx, -1234);
        assert_eq!(snap.sticks.ly, i16::MAX);
        assert_eq!(snap.sticks.rx, i16::MIN);
        assert_eq!(snap.sticks.ry, 0x0201);
    }

    #[test]
    fn test_u16_triggers_fold() {
        let mut data = deck_report();
        // rt at 24, lt at 26
        data[24..26].copy_from_slice(&0x7F00u16.to_le_bytes());
        data[26..28].copy_from_slice(&200u16.to_le_bytes());
        let snap = decode(&data, &ReportLayout::deck_v2()).expect("decode");
        assert_eq!(snap.triggers.rt, 0x7F);
        assert_eq!(snap.triggers.lt, 200);
    }

    #[test]
    fn test_fold_trigger_boundaries() {
        assert_eq!(fold_trigger(0), 0);
        assert_eq!(fold_trigger(255), 255);
        assert_eq!(fold_trigger(256), 1);
        assert_eq!(fold_trigger(u16::MAX), 255);
    }

    #[test]
    fn test_compact_layout() {
        let mut data = [0u8; 16];
        data[4..6].copy_from_slice(&500i16.to_le_bytes());
        data[12] = 17;
        data[13] = 255;
        let snap = decode(&data, &ReportLayout::compact()).expect("decode");
        assert!(snap.pressed.is_empty());
        assert_eq!(snap.sticks.lx, 500);
        assert_eq!(snap.triggers, Triggers { lt: 17, rt: 255 });
    }

    #[test]
    fn test_longer_buffers_accepted() {
        let data = [0u8; 64];
        assert!(decode(&data, &ReportLayout::compact()).is_ok());
    }

    #[test]
    fn test_reader_out_of_range() {
        let data = [1u8, 2, 3];
        let reader = ReportReader::new(&data, 16);
        assert_eq!(reader.read_u8(2), Ok(3));
        assert!(reader.read_u8(3).is_err());
        assert_eq!(reader.read_u16_le(1), Ok(0x0302));
        assert!(reader.read_u16_le(2).is_err());
        assert!(reader.read_u16_le(usize::MAX).is_err());
    }

    #[test]
    fn test_encode_matches_decode() {
        let layout = ReportLayout::deck_v2();
        let mut snap = Snapshot::default();
        snap.pressed.insert(Button::L1);
        snap.pressed.insert(Button::DPadDown);
        snap.sticks = Sticks {
            lx: -32768,
            ly: 32767,
            rx: 0,
            ry: -1,
        };
        snap.triggers = Triggers { lt: 255, rt: 0 };
        let raw = encode(&snap, &layout);
        assert_eq!(raw.len(), 64);
        assert_eq!(decode(&raw, &layout), Ok(snap));
    }
}
