//! Elster payload layout.
//!
//! ```text
//! byte 0..1  target identifier (read / write / response id, big endian);
//!            low nibble of byte 0 = message kind
//! byte 2     elster index (short form) or 0xFA (extended form marker)
//! short:     byte 3..4 value
//! extended:  byte 3..4 elster index, byte 5..6 value
//! ```
//!
//! Decoding is total: out-of-range lengths produce [`NO_INDEX`] / [`NO_VALUE`]
//! instead of errors, and no byte past the frame length is ever read.
use crate::core::{EXTENDED_INDEX_MARKER, NO_INDEX, NO_VALUE};
use crate::protocol::transport::bus_member::BusMember;
use crate::protocol::transport::can_frame::CanFrame;

/// Length of every frame this crate emits (extended form).
pub const ELSTER_FRAME_LEN: usize = 7;

//==================================================================================MESSAGE_KIND
/// Classification of the low nibble of payload byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Nibble 0: a value written to the addressed member.
    Write,
    /// Nibble 1: a read request. Observed, never dispatched.
    Request,
    /// Nibble 2: the member answering with its current value.
    Response,
    /// Any other nibble.
    Unknown(u8),
    /// Empty payload: nothing to classify.
    Empty,
}

impl MessageKind {
    /// Classify a payload's first byte.
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x0F {
            0 => Self::Write,
            1 => Self::Request,
            2 => Self::Response,
            other => Self::Unknown(other),
        }
    }
}

//==================================================================================DECODED_FRAME
/// Elster fields extracted from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedFrame {
    pub kind: MessageKind,
    /// `None` when the payload length rules out an index.
    pub elster_index: Option<u16>,
    /// `None` when the payload length rules out a value. A present value may
    /// still be the wire's own [`NO_VALUE`] pattern.
    pub value: Option<u16>,
}

/// Decode kind, index and value.
pub fn decode(frame: &CanFrame) -> DecodedFrame {
    let index = elster_index_raw(frame);
    let value = value_raw(frame);
    DecodedFrame {
        kind: message_kind(frame),
        elster_index: has_index(frame).then_some(index),
        value: has_value(frame).then_some(value),
    }
}

/// Message kind carried by byte 0.
pub fn message_kind(frame: &CanFrame) -> MessageKind {
    match frame.payload().first() {
        Some(&byte) => MessageKind::from_byte(byte),
        None => MessageKind::Empty,
    }
}

/// Elster index, or [`NO_INDEX`] when the length is outside `[3, 7]`
/// (`[5, 7]` for the extended form).
pub fn elster_index_raw(frame: &CanFrame) -> u16 {
    let data = frame.payload();
    if !(3..=7).contains(&data.len()) {
        return NO_INDEX;
    }

    if data[2] == EXTENDED_INDEX_MARKER {
        if data.len() < 5 {
            return NO_INDEX;
        }
        u16::from_be_bytes([data[3], data[4]])
    } else {
        data[2] as u16
    }
}

/// Raw register word, or [`NO_VALUE`] when the length is outside `[5, 7]`
/// (exactly 7 for the extended form).
pub fn value_raw(frame: &CanFrame) -> u16 {
    let data = frame.payload();
    if !(5..=7).contains(&data.len()) {
        return NO_VALUE;
    }

    if data[2] == EXTENDED_INDEX_MARKER {
        if data.len() != 7 {
            return NO_VALUE;
        }
        return u16::from_be_bytes([data[5], data[6]]);
    }

    u16::from_be_bytes([data[3], data[4]])
}

// An extended frame may legitimately address index 0xFFFF; only the length
// rules decide whether an index was present.
fn has_index(frame: &CanFrame) -> bool {
    let data = frame.payload();
    match data.len() {
        3..=7 => data[2] != EXTENDED_INDEX_MARKER || data.len() >= 5,
        _ => false,
    }
}

fn has_value(frame: &CanFrame) -> bool {
    let data = frame.payload();
    match data.len() {
        5..=7 => data[2] != EXTENDED_INDEX_MARKER || data.len() == 7,
        _ => false,
    }
}

//==================================================================================ENCODE
/// Read request for `elster_index` on `target`, sent as `sender`.
pub fn encode_read(sender: &BusMember, target: &BusMember, elster_index: u16) -> CanFrame {
    build(sender, target.read_id(), elster_index, 0)
}

/// Write of the raw word `value` to `elster_index` on `target`, sent as `sender`.
pub fn encode_write(
    sender: &BusMember,
    target: &BusMember,
    elster_index: u16,
    value: u16,
) -> CanFrame {
    build(sender, target.write_id(), elster_index, value)
}

fn build(sender: &BusMember, target_id: u16, elster_index: u16, value: u16) -> CanFrame {
    let [id_hi, id_lo] = target_id.to_be_bytes();
    let [idx_hi, idx_lo] = elster_index.to_be_bytes();
    let [val_hi, val_lo] = value.to_be_bytes();

    CanFrame::new(
        sender.can_id(),
        &[
            id_hi,
            id_lo,
            EXTENDED_INDEX_MARKER,
            idx_hi,
            idx_lo,
            val_hi,
            val_lo,
        ],
    )
}
