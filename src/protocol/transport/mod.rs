//! Elster transport layer: CAN frame and identifier representations, bus
//! member addressing, the rate-limited request queue, and bus abstraction traits.
//!
//! ## Timing Constants
//!
//! These constants define the default pacing of the protocol. None of them is
//! mandated by the controller; they are the values known to keep a heating
//! bus responsive.

pub mod bus_member;
pub mod can_frame;
pub mod can_id;
pub mod request_queue;
pub mod traits;

/// Default interval between two frames leaving the request queue (ms).
///
/// The controller answers every read request, so a burst of polls produces a
/// burst of responses. Pacing requests at 50 ms keeps both directions well below
/// the bus capacity at 20 kbit/s, the usual speed of these installations.
pub const QUEUE_DRAIN_INTERVAL_MS: u32 = 50;

/// Default delay between a write and the read that confirms it (ms).
///
/// The controller needs a moment before the written register reports its new
/// value; reading back after 500 ms returns the settled state.
pub const CONFIRM_READ_DELAY_MS: u32 = 500;

/// Default poll interval of read-only watchers (ms).
pub const DEFAULT_SENSOR_POLL_MS: u32 = 60_000;

/// Default poll interval of writable watchers (ms).
pub const DEFAULT_NUMBER_POLL_MS: u32 = 30_000;
