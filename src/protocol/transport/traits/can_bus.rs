//! Minimal abstraction for an asynchronous CAN bus. Allows the library to plug
//! into various implementations (embedded HAL, socketcan, test doubles).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to send and receive CAN frames asynchronously.
///
/// Elster frames are emitted with the sender's 11-bit address; implementations
/// should transmit identifiers that fit 11 bits as standard frames
/// (see [`CanId::is_standard`](crate::protocol::transport::can_id::CanId::is_standard)).
/// Received frames are handed over whatever their identifier format.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Retries, if any, are the implementation's business.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Retrieve the next available frame. Asynchronously waits until data arrives.
    fn recv<'a>(
        &'a mut self,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a;
}
