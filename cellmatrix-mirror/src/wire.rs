//! Framing for the paired mirror byte streams.
//!
//! Controls channel (backend to application): a fixed-size controller
//! status frame, a `u16` text length, and that many bytes of payload.
//! A `screen/resize` dispatch carries a matrix-parameters snapshot as
//! its payload.
//!
//! Display channel (application to backend): every message is a pair
//! of area headers. A non-zero destination with an empty source is an
//! invalidation and is followed by `lines * span` serialized cells in
//! row-major order; a pair of zero areas signals dispatch; a zero
//! destination with the sync sentinel in the source span requests I/O
//! synchronization.

use std::io::{Read, Write};

use cellmatrix_core::{ControllerStatus, KeyModifiers};
use cellmatrix_data::CellArea;

/// Wire size of a controller status frame:
/// `dispatch, quantity, keys, top, left`, each 32 bits little-endian.
pub const STATUS_WIRE_SIZE: usize = 20;

/// Sync sentinel carried in the source span of a `(zero, sync)` pair.
pub const SYNCHRONIZE_SIGNAL: u16 = 2;

/// The all-zero area used in signal pairs.
pub const ZERO_AREA: CellArea = CellArea { top_offset: 0, left_offset: 0, lines: 0, span: 0 };

/// Writes a controller status frame.
pub fn write_status(
    out: &mut impl Write,
    status: &ControllerStatus,
    text: &[u8],
) -> std::io::Result<()> {
    let mut frame = [0u8; STATUS_WIRE_SIZE];
    frame[0..4].copy_from_slice(&status.dispatch.to_le_bytes());
    frame[4..8].copy_from_slice(&status.quantity.to_le_bytes());
    frame[8..12].copy_from_slice(&status.keys.bits().to_le_bytes());
    frame[12..16].copy_from_slice(&status.top.to_le_bytes());
    frame[16..20].copy_from_slice(&status.left.to_le_bytes());
    out.write_all(&frame)?;

    let length = text.len().min(u16::MAX as usize) as u16;
    out.write_all(&length.to_le_bytes())?;
    out.write_all(&text[..length as usize])
}

/// Reads a controller status frame and its payload.
///
/// Any EOF or read failure returns `None`; the caller synthesizes the
/// session-close event.
pub fn read_status(input: &mut impl Read) -> Option<(ControllerStatus, Vec<u8>)> {
    let mut frame = [0u8; STATUS_WIRE_SIZE];
    input.read_exact(&mut frame).ok()?;

    let word = |i: usize| {
        i32::from_le_bytes([frame[i * 4], frame[i * 4 + 1], frame[i * 4 + 2], frame[i * 4 + 3]])
    };
    let status = ControllerStatus {
        dispatch: word(0),
        quantity: word(1),
        keys: KeyModifiers::from_bits_truncate(word(2) as u32),
        text_length: 0,
        top: word(3),
        left: word(4),
        receiver: None,
    };

    let mut length = [0u8; 2];
    input.read_exact(&mut length).ok()?;
    let length = u16::from_le_bytes(length) as usize;

    let mut payload = vec![0u8; length];
    input.read_exact(&mut payload).ok()?;

    Some((status, payload))
}

pub fn write_area(out: &mut impl Write, area: CellArea) -> std::io::Result<()> {
    out.write_all(&area.to_bytes())
}

pub fn read_area(input: &mut impl Read) -> Option<CellArea> {
    let mut bytes = [0u8; CellArea::SIZE];
    input.read_exact(&mut bytes).ok()?;
    CellArea::from_bytes(&bytes).ok()
}
