//! Bus members and the Elster addressing scheme.
//!
//! Every participant owns an 11-bit base address. The identifiers placed in
//! the first two payload bytes of a request are derived from it:
//!
//! ```text
//! write_id    = ((address & 0x7C0) << 5) | (address & 0x3F)
//! read_id     = write_id | 0x100
//! response_id = write_id | 0x200
//! ```
//!
//! The low nibble of the high byte therefore carries the message kind
//! (0 = write, 1 = read request, 2 = response).
use crate::core::{config_name_eq, NO_INDEX, PASSIVE_MARKER};
use crate::error::ParseError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use core::fmt;
use core::str::FromStr;

//==================================================================================BUS_MEMBER
/// Logical participant on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusMember {
    address: u16,
    name: &'static str,
}

impl BusMember {
    /// Address mask (11 bits).
    pub const ADDRESS_MASK: u16 = 0x7FF;

    /// This controller's own identity on the bus.
    pub const ESP_CLIENT: BusMember = BusMember::new(0x6A2, "ESPClient");
    pub const MANAGER: BusMember = BusMember::new(0x514, "Manager");
    /// Boiler.
    pub const KESSEL: BusMember = BusMember::new(0x180, "Kessel");
    /// Heating circuit 1.
    pub const HK1: BusMember = BusMember::new(0x601, "HK1");
    /// Heating circuit 2.
    pub const HK2: BusMember = BusMember::new(0x602, "HK2");
    /// Remote control unit.
    pub const FET: BusMember = BusMember::new(0x402, "FET");
    pub const MFG: BusMember = BusMember::new(0x700, "MFG");
    /// Heat-pump manager.
    pub const WPM: BusMember = BusMember::new(0x480, "WPM");
    /// Domestic hot water temperature.
    pub const WWTEMP: BusMember = BusMember::new(0x201, "WWTEMP");

    /// The fixed set of members known on a typical installation.
    pub const WELL_KNOWN: [BusMember; 9] = [
        Self::ESP_CLIENT,
        Self::MANAGER,
        Self::KESSEL,
        Self::HK1,
        Self::HK2,
        Self::FET,
        Self::MFG,
        Self::WPM,
        Self::WWTEMP,
    ];

    /// Declare a member. Bits above the 11-bit range are dropped.
    pub const fn new(address: u16, name: &'static str) -> Self {
        Self {
            address: address & Self::ADDRESS_MASK,
            name,
        }
    }

    /// Member reached through a raw address; well-known addresses keep their name.
    pub fn from_address(address: u16) -> Self {
        let address = address & Self::ADDRESS_MASK;
        Self::WELL_KNOWN
            .iter()
            .copied()
            .find(|member| member.address == address)
            .unwrap_or(Self::new(address, "Custom"))
    }

    /// 11-bit base address.
    #[inline]
    pub const fn address(&self) -> u16 {
        self.address
    }

    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// CAN identifier the member transmits with.
    #[inline]
    pub const fn can_id(&self) -> CanId {
        CanId(self.address as u32)
    }

    /// Identifier used when writing one of this member's registers.
    #[inline]
    pub const fn write_id(&self) -> u16 {
        ((self.address & 0x7C0) << 5) | (self.address & 0x3F)
    }

    /// Identifier used when requesting one of this member's registers.
    #[inline]
    pub const fn read_id(&self) -> u16 {
        self.write_id() | 0x100
    }

    /// Identifier this member's registers are answered to.
    #[inline]
    pub const fn response_id(&self) -> u16 {
        self.write_id() | 0x200
    }
}

impl fmt::Display for BusMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#05x})", self.name, self.address)
    }
}

impl FromStr for BusMember {
    type Err = ParseError;

    /// Resolve a well-known member by name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::WELL_KNOWN
            .iter()
            .copied()
            .find(|member| config_name_eq(s, member.name))
            .ok_or(ParseError::UnknownMember)
    }
}

//==================================================================================RECEIVER
/// Address-like receiver recovered from the identifier bytes of a payload.
///
/// Returns [`NO_INDEX`] when the payload is shorter than two bytes or byte 1
/// holds the passive marker. Diagnostic only: routing uses the CAN identifier.
pub fn receiver_id(frame: &CanFrame) -> u16 {
    let payload = frame.payload();
    if payload.len() < 2 || payload[1] == PASSIVE_MARKER {
        return NO_INDEX;
    }
    (((payload[0] & 0xF0) as u16) << 3) + (payload[1] & 0x7F) as u16
}
