//! Conversion between raw 16-bit register words and engineering values.
//!
//! Multi-word registers are decoded word by word without scaling, then
//! assembled with [`combine`].
use crate::core::{RegisterEncoding, DECIMAL_FACTORS, NO_VALUE};

//==================================================================================ENCODE
/// Encode an engineering value into the word written on the bus.
///
/// Fixed-point kinds round half away from zero and wrap into 16 bits;
/// every other kind truncates. Multi-word kinds fall back to the default rule.
pub fn encode(encoding: RegisterEncoding, value: f32) -> u16 {
    match encoding {
        RegisterEncoding::Dec | RegisterEncoding::Cent | RegisterEncoding::Mil => {
            let scaled = value * DECIMAL_FACTORS[encoding.decimal_scale() as usize];
            // Half away from zero; NaN becomes 0.
            libm::roundf(scaled) as i32 as i16 as u16
        }
        RegisterEncoding::LittleEndian => truncate(value).swap_bytes(),
        _ => truncate(value),
    }
}

//==================================================================================DECODE
/// Decode a raw word. [`NO_VALUE`] is NaN for every encoding.
pub fn decode(encoding: RegisterEncoding, raw: u16) -> f32 {
    if raw == NO_VALUE {
        return f32::NAN;
    }

    match encoding {
        RegisterEncoding::Dec | RegisterEncoding::Cent | RegisterEncoding::Mil => {
            raw as i16 as f32 / DECIMAL_FACTORS[encoding.decimal_scale() as usize]
        }
        RegisterEncoding::LittleEndian => raw.swap_bytes() as f32,
        _ => raw as f32,
    }
}

/// Decode one word of a multi-word register: unsigned, never scaled.
pub fn decode_word(raw: u16) -> f32 {
    decode(RegisterEncoding::Default, raw)
}

//==================================================================================COMBINE
/// Assemble the words of a double/triple register, `words[0]` holding the
/// lowest elster index.
///
/// Most-significant-first kinds weigh the words `10^6, 10^3, 10^0` (triple)
/// or `10^3, 10^0` (double); the inverse kinds reverse the weights. Any NaN
/// among the required words yields NaN. Single-word kinds return `words[0]`.
pub fn combine(encoding: RegisterEncoding, words: &[f32; 3]) -> f32 {
    let count = encoding.word_count() as usize;
    if words[..count].iter().any(|w| w.is_nan()) {
        return f32::NAN;
    }

    match encoding {
        RegisterEncoding::Double => words[0] * 1_000.0 + words[1],
        RegisterEncoding::Triple => words[0] * 1_000_000.0 + words[1] * 1_000.0 + words[2],
        RegisterEncoding::InvDouble => words[0] + words[1] * 1_000.0,
        RegisterEncoding::InvTriple => words[0] + words[1] * 1_000.0 + words[2] * 1_000_000.0,
        _ => words[0],
    }
}

// `as` truncates toward zero and saturates; NaN becomes 0.
fn truncate(value: f32) -> u16 {
    value as i32 as u16
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
