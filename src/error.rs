//! Error definitions shared across library modules.
//! Frame and value decoding never fail (malformed input degrades to a wire
//! sentinel); the types below cover configuration, queueing, control requests
//! and the transport failures surfaced by the runner.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Configuration names that do not match the known vocabulary.
pub enum ParseError {
    /// Name is not a register encoding.
    #[error("Unknown register encoding")]
    UnknownEncoding,
    /// Name is not a well-known bus member.
    #[error("Unknown bus member")]
    UnknownMember,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while registering a watcher.
pub enum RegistryError {
    /// Registry already holds its maximum number of watchers.
    #[error("Watcher registry is full")]
    Full,
    /// A multi-word register range shares an index with a multi-word
    /// watcher already registered on the same member.
    #[error("Register range overlaps a registered multi-word watcher")]
    Overlap,
}

//================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outbound request queue rejections.
pub enum QueueError {
    /// Not enough room left for the whole read cycle.
    #[error("Request queue full (capacity {capacity})")]
    Full { capacity: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors returned when asking a watcher for a fresh read cycle.
pub enum RefreshError {
    /// Handle does not designate a registered watcher.
    #[error("Unknown watcher")]
    UnknownWatcher,
    /// Watcher was disabled at setup and never issues requests.
    #[error("Watcher is disabled")]
    Disabled,
    /// Read cycle did not fit into the request queue.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

//================================================================================CONTROL_ERROR
#[derive(Error, Debug, PartialEq)]
/// Errors returned when writing a value to a register.
pub enum ControlError<E: core::fmt::Debug> {
    /// Handle designates a read-only watcher.
    #[error("Watcher is read-only")]
    NotWritable,
    /// Watcher was disabled at setup (unsupported configuration).
    #[error("Watcher is disabled")]
    Disabled,
    /// Handle does not designate a registered watcher.
    #[error("Unknown watcher")]
    UnknownWatcher,
    /// Requested value lies outside the configured limits.
    #[error("Value {value} outside [{min}, {max}]")]
    OutOfRange { value: f32, min: f32, max: f32 },
    /// NaN or infinite values cannot be encoded.
    #[error("Value is not finite")]
    NotFinite,
    /// CAN layer refused or failed to send the write frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}

//================================================================================RUN_ERROR
#[derive(Debug, Error)]
/// Fatal errors ending the register runner loop.
pub enum RunError<E: core::fmt::Debug> {
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// Unable to send a queued or control frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
