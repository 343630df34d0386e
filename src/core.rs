//! Shared vocabulary between the codecs and the register layer: the
//! per-register encoding table and the sentinel values the wire uses for
//! "nothing here".
use crate::error::ParseError;
use core::str::FromStr;

/// Sentinel returned when no elster index (or receiver) can be resolved from a frame.
pub const NO_INDEX: u16 = 0xFFFF;
/// Sentinel meaning "value unavailable", both on the wire and for short payloads.
pub const NO_VALUE: u16 = 0x8000;
/// Byte 2 marker announcing the two-byte (extended) elster index form.
pub const EXTENDED_INDEX_MARKER: u8 = 0xFA;
/// Byte 1 marker of passive requests: the frame carries no addressable receiver.
pub const PASSIVE_MARKER: u8 = 0x79;

/// Decimal multipliers indexed by `decimal_scale()`.
pub(crate) const DECIMAL_FACTORS: [f32; 4] = [1.0, 10.0, 100.0, 1000.0];

//==================================================================================REGISTER_ENCODING
/// Wire encoding of an Elster register.
///
/// The numeric discriminants follow the controller's type table, so
/// [`RegisterEncoding::from_code`] accepts the codes found in register maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RegisterEncoding {
    /// Unsigned raw word.
    #[default]
    Default = 0,
    /// Signed, one decimal (`xx.x`).
    Dec = 1,
    /// Signed, two decimals (`x.xx`).
    Cent = 2,
    /// Signed, three decimals (`x.xxx`).
    Mil = 3,
    Byte = 4,
    /// `0x0000` / `0x0001`.
    Bool = 5,
    /// `0x0000` / `0x0100`.
    LittleBool = 6,
    /// Two consecutive registers, most significant first (10^3, 10^0).
    Double = 7,
    /// Three consecutive registers, most significant first (10^6, 10^3, 10^0).
    Triple = 8,
    /// Two consecutive registers, least significant first (10^0, 10^3).
    InvDouble = 9,
    /// Three consecutive registers, least significant first (10^0, 10^3, 10^6).
    InvTriple = 10,
    /// Byte-swapped unsigned word.
    LittleEndian = 11,
    /// Operating mode ("Betriebsart").
    Mode = 12,
    Time = 13,
    Date = 14,
    TimeDomain = 15,
    DeviceNumber = 16,
    ErrorNumber = 17,
    DeviceId = 18,
}

impl RegisterEncoding {
    /// Every encoding, in type-table order.
    pub const ALL: [RegisterEncoding; 19] = [
        Self::Default,
        Self::Dec,
        Self::Cent,
        Self::Mil,
        Self::Byte,
        Self::Bool,
        Self::LittleBool,
        Self::Double,
        Self::Triple,
        Self::InvDouble,
        Self::InvTriple,
        Self::LittleEndian,
        Self::Mode,
        Self::Time,
        Self::Date,
        Self::TimeDomain,
        Self::DeviceNumber,
        Self::ErrorNumber,
        Self::DeviceId,
    ];

    /// Map a numeric type code (0-18) to its encoding.
    pub const fn from_code(code: u8) -> Option<Self> {
        if (code as usize) < Self::ALL.len() {
            Some(Self::ALL[code as usize])
        } else {
            None
        }
    }

    /// Numeric type code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Number of decimals carried by the fixed-point kinds, 0 for everything else.
    #[inline]
    pub const fn decimal_scale(self) -> u8 {
        match self {
            Self::Dec => 1,
            Self::Cent => 2,
            Self::Mil => 3,
            _ => 0,
        }
    }

    /// Number of consecutive registers that make up one value.
    #[inline]
    pub const fn word_count(self) -> u8 {
        match self {
            Self::Double | Self::InvDouble => 2,
            Self::Triple | Self::InvTriple => 3,
            _ => 1,
        }
    }

    /// True for the double/triple kinds (and their inverse forms).
    #[inline]
    pub const fn is_multi_word(self) -> bool {
        self.word_count() > 1
    }

    /// True when the least significant word comes first.
    #[inline]
    pub const fn is_inverse(self) -> bool {
        matches!(self, Self::InvDouble | Self::InvTriple)
    }

    /// Smallest representable increment for a writable register.
    pub fn step(self) -> f32 {
        1.0 / DECIMAL_FACTORS[self.decimal_scale() as usize]
    }

    /// Configuration name of the encoding.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Dec => "DEC",
            Self::Cent => "CENT",
            Self::Mil => "MIL",
            Self::Byte => "BYTE",
            Self::Bool => "BOOL",
            Self::LittleBool => "LITTLE_BOOL",
            Self::Double => "DOUBLE",
            Self::Triple => "TRIPLE",
            Self::InvDouble => "INV_DOUBLE",
            Self::InvTriple => "INV_TRIPLE",
            Self::LittleEndian => "LITTLE_ENDIAN",
            Self::Mode => "MODE",
            Self::Time => "TIME",
            Self::Date => "DATE",
            Self::TimeDomain => "TIME_DOMAIN",
            Self::DeviceNumber => "DEV_NR",
            Self::ErrorNumber => "ERR_NR",
            Self::DeviceId => "DEV_ID",
        }
    }
}

impl core::fmt::Display for RegisterEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegisterEncoding {
    type Err = ParseError;

    /// Accepts configuration names case-insensitively, spaces standing for underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|encoding| config_name_eq(s, encoding.name()))
            .ok_or(ParseError::UnknownEncoding)
    }
}

/// Compare a user-supplied name against a canonical identifier, ignoring
/// ASCII case and accepting spaces for underscores.
pub(crate) fn config_name_eq(input: &str, canonical: &str) -> bool {
    let input = input.trim();
    input.len() == canonical.len()
        && input.bytes().zip(canonical.bytes()).all(|(a, b)| {
            let a = if a == b' ' { b'_' } else { a };
            a.eq_ignore_ascii_case(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_queryable_per_variant() {
        assert_eq!(RegisterEncoding::Dec.decimal_scale(), 1);
        assert_eq!(RegisterEncoding::Mil.decimal_scale(), 3);
        assert_eq!(RegisterEncoding::Triple.decimal_scale(), 0);
        assert_eq!(RegisterEncoding::InvDouble.word_count(), 2);
        assert_eq!(RegisterEncoding::Triple.word_count(), 3);
        assert_eq!(RegisterEncoding::LittleEndian.word_count(), 1);
        assert!(RegisterEncoding::InvTriple.is_inverse());
        assert!(!RegisterEncoding::Triple.is_inverse());
    }

    #[test]
    fn codes_follow_the_type_table() {
        for (code, encoding) in RegisterEncoding::ALL.iter().enumerate() {
            assert_eq!(encoding.code() as usize, code);
            assert_eq!(RegisterEncoding::from_code(code as u8), Some(*encoding));
        }
        assert_eq!(RegisterEncoding::from_code(19), None);
    }

    #[test]
    fn parses_configuration_names() {
        assert_eq!("dec".parse(), Ok(RegisterEncoding::Dec));
        assert_eq!("inv triple".parse(), Ok(RegisterEncoding::InvTriple));
        assert_eq!(" LITTLE_ENDIAN ".parse(), Ok(RegisterEncoding::LittleEndian));
        assert_eq!(
            "quad".parse::<RegisterEncoding>(),
            Err(ParseError::UnknownEncoding)
        );
    }

    #[test]
    fn step_matches_decimal_scale() {
        assert_eq!(RegisterEncoding::Default.step(), 1.0);
        assert_eq!(RegisterEncoding::Dec.step(), 0.1);
        assert_eq!(RegisterEncoding::Cent.step(), 0.01);
        assert_eq!(RegisterEncoding::Mil.step(), 0.001);
    }
}
