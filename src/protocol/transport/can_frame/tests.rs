//! Frame construction, HAL conversion and log-line rendering.
use super::*;
use core::fmt::Write;

/// Minimal HAL frame used to exercise the `embedded_can` conversions.
#[derive(Debug, Clone, PartialEq)]
struct HalFrame {
    id: Id,
    remote: bool,
    data: [u8; 8],
    dlc: usize,
}

impl Frame for HalFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            remote: false,
            data: buf,
            dlc: data.len(),
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        Some(Self {
            id: id.into(),
            remote: true,
            data: [0; 8],
            dlc,
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }
}

#[test]
/// Oversized payloads are truncated to eight bytes.
fn test_new_truncates() {
    let frame = CanFrame::new(CanId(0x180), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(frame.len, 8);
    assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
/// A corrupted `len` never lets `payload()` read past the buffer.
fn test_payload_clamps_len() {
    let frame = CanFrame {
        id: CanId(0x180),
        data: [0; 8],
        len: 42,
    };
    assert_eq!(frame.payload().len(), 8);
}

#[test]
/// Standard identifiers survive a round trip through a HAL frame.
fn test_embedded_standard_roundtrip() {
    let frame = CanFrame::new(CanId(0x6A2), &[0x31, 0x00, 0xFA, 0x00, 0x0C, 0x00, 0x00]);
    let hal: HalFrame = frame.to_embedded().expect("standard frame must convert");
    assert!(hal.is_standard());
    assert_eq!(CanFrame::from_embedded(&hal), frame);
}

#[test]
/// Identifiers wider than 11 bits go out as extended frames.
fn test_embedded_extended() {
    let frame = CanFrame::new(CanId(0x1234), &[0x02]);
    let hal: HalFrame = frame.to_embedded().expect("extended frame must convert");
    assert!(hal.is_extended());
}

#[test]
/// Remote frames carry no payload.
fn test_embedded_remote_frame() {
    let hal = HalFrame::new_remote(StandardId::new(0x180).unwrap(), 4).unwrap();
    let frame = CanFrame::from_embedded(&hal);
    assert_eq!(frame.len, 0);
}

#[test]
/// Response frames render the value after `==`.
fn test_log_line_response() {
    let frame = CanFrame::new(CanId(0x180), &[0x02, 0x00, 0xFA, 0x00, 0x10, 0x00, 0x96]);
    let mut line: heapless::String<128> = heapless::String::new();
    write!(line, "{}", frame).unwrap();
    assert_eq!(
        line.as_str(),
        "       180 [7] 02 00 fa 00 10 00 96     .......   0x0010 ==   150  (180 ->   0)"
    );
}

#[test]
/// Read requests render the placeholder and printable bytes as ASCII.
fn test_log_line_request() {
    let frame = CanFrame::new(CanId(0x6A2), &[0x31, 0x00, 0xFA, 0x01, 0x41]);
    let mut line: heapless::String<128> = heapless::String::new();
    write!(line, "{}", frame).unwrap();
    assert!(line.contains("31 00 fa 01 41 "));
    assert!(line.contains(" 1...A   "));
    assert!(line.contains("0x0141 ??      "));
    assert!(line.ends_with("(6a2 -> 180)"));
}
