//! Value codec tests: fixed-point round trips, byte swapping, sentinel
//! propagation and multi-word assembly.
use super::*;

fn approx(a: f32, b: f32, tolerance: f32) -> bool {
    let diff = a - b;
    diff <= tolerance && diff >= -tolerance
}

#[test]
/// Fixed-point kinds survive encode → decode within their resolution.
fn test_fixed_point_roundtrip() {
    let cases: [(RegisterEncoding, f32); 9] = [
        (RegisterEncoding::Dec, 21.5),
        (RegisterEncoding::Dec, -12.3),
        (RegisterEncoding::Dec, 0.0),
        (RegisterEncoding::Cent, 23.45),
        (RegisterEncoding::Cent, -1.07),
        (RegisterEncoding::Cent, 327.67),
        (RegisterEncoding::Mil, 1.234),
        (RegisterEncoding::Mil, -32.767),
        (RegisterEncoding::Mil, 0.001),
    ];

    for (encoding, value) in cases {
        let decoded = decode(encoding, encode(encoding, value));
        assert!(
            approx(decoded, value, encoding.step() / 2.0),
            "{:?}: {} -> {}",
            encoding,
            value,
            decoded
        );
    }
}

#[test]
/// Integer kinds survive a round trip for representative values.
fn test_integer_roundtrip() {
    let kinds = [
        RegisterEncoding::Default,
        RegisterEncoding::Byte,
        RegisterEncoding::Bool,
        RegisterEncoding::LittleBool,
        RegisterEncoding::LittleEndian,
        RegisterEncoding::Mode,
        RegisterEncoding::Time,
        RegisterEncoding::Date,
        RegisterEncoding::TimeDomain,
        RegisterEncoding::DeviceNumber,
        RegisterEncoding::ErrorNumber,
        RegisterEncoding::DeviceId,
    ];
    for encoding in kinds {
        for value in [0.0f32, 1.0, 255.0, 4660.0, 65535.0] {
            assert_eq!(decode(encoding, encode(encoding, value)), value, "{:?}", encoding);
        }
    }
}

#[test]
/// Fixed-point encoding rounds and goes through two's complement.
fn test_fixed_point_encoding() {
    assert_eq!(encode(RegisterEncoding::Dec, 15.0), 150);
    assert_eq!(encode(RegisterEncoding::Dec, 21.96), 220);
    assert_eq!(encode(RegisterEncoding::Dec, -0.5), 0xFFFB);
    assert_eq!(encode(RegisterEncoding::Cent, 23.45), 2345);
    assert_eq!(encode(RegisterEncoding::Mil, -1.0), 0xFC18);
    assert_eq!(decode(RegisterEncoding::Dec, 0xFFFB), -0.5);
}

#[test]
/// Byte-swapped kind swaps in both directions.
fn test_little_endian() {
    assert_eq!(encode(RegisterEncoding::LittleEndian, 0x1234 as f32), 0x3412);
    assert_eq!(decode(RegisterEncoding::LittleEndian, 0x3412), 0x1234 as f32);
    assert_eq!(decode(RegisterEncoding::LittleEndian, 0x0100), 1.0);
}

#[test]
/// Default truncates toward zero; multi-word kinds reuse the default rule.
fn test_default_truncates() {
    assert_eq!(encode(RegisterEncoding::Default, 42.9), 42);
    assert_eq!(encode(RegisterEncoding::Triple, 42.9), 42);
    assert_eq!(encode(RegisterEncoding::InvDouble, 7.0), 7);
}

#[test]
/// Default and opaque kinds decode unsigned, without scaling.
fn test_unsigned_decode() {
    assert_eq!(decode(RegisterEncoding::Default, 0xFFFF), 65535.0);
    assert_eq!(decode(RegisterEncoding::ErrorNumber, 0x0102), 258.0);
    assert_eq!(decode(RegisterEncoding::Triple, 0x00FA), 250.0);
}

#[test]
/// The missing-value pattern is NaN for every encoding.
fn test_sentinel_is_nan_everywhere() {
    for encoding in RegisterEncoding::ALL {
        assert!(decode(encoding, NO_VALUE).is_nan(), "{:?}", encoding);
    }
    assert!(decode_word(NO_VALUE).is_nan());
}

#[test]
/// Literal combination vectors for both word orders.
fn test_combine() {
    assert_eq!(combine(RegisterEncoding::Triple, &[1.0, 234.0, 567.0]), 1_234_567.0);
    assert_eq!(
        combine(RegisterEncoding::InvTriple, &[567.0, 234.0, 1.0]),
        1_234_567.0
    );
    assert_eq!(combine(RegisterEncoding::Double, &[12.0, 345.0, 0.0]), 12_345.0);
    assert_eq!(combine(RegisterEncoding::InvDouble, &[345.0, 12.0, 0.0]), 12_345.0);
}

#[test]
/// A missing required word blocks the combination; unused words are ignored.
fn test_combine_requires_all_words() {
    assert!(combine(RegisterEncoding::Triple, &[1.0, f32::NAN, 3.0]).is_nan());
    assert!(combine(RegisterEncoding::InvTriple, &[1.0, 2.0, f32::NAN]).is_nan());
    assert_eq!(combine(RegisterEncoding::Double, &[1.0, 2.0, f32::NAN]), 1_002.0);
}

#[test]
/// Scaled values just below a half round down; exact halves round away from zero.
fn test_rounding_near_half() {
    assert_eq!(encode(RegisterEncoding::Dec, 0.049999997), 0);
    assert_eq!(encode(RegisterEncoding::Dec, -0.049999997), 0);
    assert_eq!(encode(RegisterEncoding::Dec, 0.25), 3);
    assert_eq!(encode(RegisterEncoding::Dec, -0.25), 0xFFFD);
    assert_eq!(encode(RegisterEncoding::Cent, 0.004999999), 0);
    assert_eq!(encode(RegisterEncoding::Dec, f32::NAN), 0);
}
