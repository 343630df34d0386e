//! In-memory representation of a classic CAN frame as exchanged with the
//! heating controller, plus its one-line diagnostic rendering.
use crate::infra::codec::frame::{self, DecodedFrame, MessageKind};
use crate::protocol::transport::bus_member::receiver_id;
use crate::protocol::transport::can_id::CanId;
use core::fmt;
use embedded_can::{ExtendedId, Frame, Id, StandardId};

/// Classic CAN payload capacity.
pub const MAX_PAYLOAD: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from, or written to, the CAN bus.
pub struct CanFrame {
    /// Identifier (the sending member's address for Elster traffic).
    pub id: CanId,
    /// Payload buffer. Bytes past `len` are meaningless.
    pub data: [u8; MAX_PAYLOAD],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build a frame, truncating payloads longer than eight bytes.
    pub fn new(id: CanId, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD);
        let mut data = [0u8; MAX_PAYLOAD];
        data[..len].copy_from_slice(&payload[..len]);
        Self { id, data, len }
    }

    /// Valid payload bytes; never longer than eight.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(MAX_PAYLOAD)]
    }

    /// Decode the Elster fields carried by the payload.
    #[inline]
    pub fn decode(&self) -> DecodedFrame {
        frame::decode(self)
    }

    /// Convert a HAL frame. Remote frames come through with an empty payload.
    pub fn from_embedded<F: Frame>(frame: &F) -> Self {
        let raw = match frame.id() {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        };
        let payload: &[u8] = if frame.is_remote_frame() {
            &[]
        } else {
            frame.data()
        };
        Self::new(CanId::new(raw), payload)
    }

    /// Convert into a HAL frame: standard identifier when it fits in 11 bits,
    /// extended otherwise. `None` when the driver refuses the frame.
    pub fn to_embedded<F: Frame>(&self) -> Option<F> {
        let id: Id = if self.id.is_standard() {
            StandardId::new(self.id.raw() as u16)?.into()
        } else {
            ExtendedId::new(self.id.raw())?.into()
        };
        F::new(id, self.payload())
    }
}

//==================================================================================LOG_LINE
/// One-line rendering used for bus traces:
/// identifier, length, hex bytes, printable ASCII, elster index, value and
/// `sender -> receiver`.
impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self.payload();
        write!(f, "  {:8x} [{}] ", self.id.raw(), payload.len())?;

        for i in 0..MAX_PAYLOAD {
            match payload.get(i) {
                Some(byte) => write!(f, "{:02x} ", byte)?,
                None => f.write_str("   ")?,
            }
        }
        f.write_str(" ")?;

        for i in 0..MAX_PAYLOAD {
            let c = match payload.get(i) {
                Some(&byte) if (b' '..127).contains(&byte) => byte as char,
                Some(_) => '.',
                None => ' ',
            };
            write!(f, "{}", c)?;
        }

        write!(f, "  0x{:04x}", frame::elster_index_raw(self))?;
        match frame::message_kind(self) {
            MessageKind::Write => write!(f, " <- {:5}", frame::value_raw(self) as i16)?,
            MessageKind::Request => f.write_str(" ??      ")?,
            MessageKind::Response => write!(f, " == {:5}", frame::value_raw(self) as i16)?,
            MessageKind::Unknown(_) | MessageKind::Empty => {}
        }

        write!(f, "  ({:3x} -> {:3x})", self.id.raw(), receiver_id(self))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
