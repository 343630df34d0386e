//! CAN identifiers as seen by the Elster protocol. Members transmit with their
//! 11-bit bus address as a standard identifier; the raw value is kept in a
//! `u32` so frames received with extended identifiers are represented as-is.

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN identifier (up to 29 bits) stored inside a `u32`.
pub struct CanId(pub u32);

impl CanId {
    /// Mask of the 29 identifier bits.
    pub const MASK: u32 = 0x1FFF_FFFF;
    /// Largest standard (11-bit) identifier.
    pub const MAX_STANDARD: u32 = 0x7FF;

    /// Wrap a raw identifier, dropping bits above the 29-bit range.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    /// Raw identifier value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0 & Self::MASK
    }

    /// True when the identifier fits the 11-bit standard format.
    #[inline]
    pub const fn is_standard(&self) -> bool {
        self.raw() <= Self::MAX_STANDARD
    }
}

impl From<u16> for CanId {
    fn from(raw: u16) -> Self {
        Self(raw as u32)
    }
}
