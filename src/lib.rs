//! `elster-can` library: primitives and protocol logic required to read and
//! write Elster registers of heat-pump / heating controllers over CAN in a
//! `no_std` environment. The crate exposes the infrastructure modules (frame
//! and value codecs), the transport layer (addressing, frames, request queue,
//! collaborator traits) and the register layer (watchers, dispatcher, runner).
#![no_std]
//==================================================================================
/// Register encodings and wire sentinels shared by the codecs and the watchers.
pub mod core;
/// Configuration, control, queue and runner errors.
pub mod error;
/// Frame and value codecs: stateless conversions between CAN payloads,
/// raw register words and engineering values.
pub mod infra;
/// Elster protocol implementation: CAN transport, bus addressing,
/// register watchers and dispatch.
pub mod protocol;
//==================================================================================
