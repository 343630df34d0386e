//! Watcher and dispatcher configuration.
//!
//! ```
//! use elster_can::core::RegisterEncoding;
//! use elster_can::protocol::registers::config::WatcherConfig;
//! use elster_can::protocol::transport::bus_member::BusMember;
//! use embassy_time::Duration;
//!
//! // Outside temperature, tenths of a degree, every 30 s
//! let outside = WatcherConfig::new(BusMember::KESSEL, 0x000C)
//!     .encoding(RegisterEncoding::Dec)
//!     .poll_interval(Duration::from_secs(30));
//!
//! assert_eq!(outside.elster_index, 0x000C);
//! ```
use crate::core::RegisterEncoding;
use crate::protocol::transport::bus_member::BusMember;
use crate::protocol::transport::{CONFIRM_READ_DELAY_MS, QUEUE_DRAIN_INTERVAL_MS};
use embassy_time::Duration;

//==================================================================================WATCHER_CONFIG
/// Static description of one watched register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherConfig {
    /// Member owning the register.
    pub target: BusMember,
    /// First (or only) elster index of the register.
    pub elster_index: u16,
    pub encoding: RegisterEncoding,
    /// `None` selects the default interval of the watcher kind.
    pub poll_interval: Option<Duration>,
    /// Accepted control range `(min, max)` for writable watchers.
    pub range: Option<(f32, f32)>,
}

impl WatcherConfig {
    /// Default-encoded register, default poll interval, no limits.
    pub const fn new(target: BusMember, elster_index: u16) -> Self {
        Self {
            target,
            elster_index,
            encoding: RegisterEncoding::Default,
            poll_interval: None,
            range: None,
        }
    }

    pub const fn encoding(mut self, encoding: RegisterEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Limits applied to control requests. Bounds are swapped if given in reverse.
    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.range = Some(if min <= max { (min, max) } else { (max, min) });
        self
    }
}

//==================================================================================DISPATCHER_CONFIG
/// Pacing and identity of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Identity used as CAN identifier for every emitted frame.
    pub sender: BusMember,
    /// Interval between two queue drains; also the scheduling resolution.
    pub drain_interval: Duration,
    /// Delay between a control write and its confirmation read.
    pub confirm_delay: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            sender: BusMember::ESP_CLIENT,
            drain_interval: Duration::from_millis(QUEUE_DRAIN_INTERVAL_MS as u64),
            confirm_delay: Duration::from_millis(CONFIRM_READ_DELAY_MS as u64),
        }
    }
}

impl DispatcherConfig {
    pub fn with_sender(mut self, sender: BusMember) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_drain_interval(mut self, interval: Duration) -> Self {
        self.drain_interval = interval;
        self
    }

    pub fn with_confirm_delay(mut self, delay: Duration) -> Self {
        self.confirm_delay = delay;
        self
    }

    /// Drain interval in milliseconds, at least 1.
    pub fn drain_interval_ms(&self) -> u32 {
        self.drain_interval.as_millis().clamp(1, u32::MAX as u64) as u32
    }

    /// Number of drain ticks covering `duration`, rounded up, at least 1.
    pub fn ticks_for(&self, duration: Duration) -> u32 {
        let tick = self.drain_interval_ms() as u64;
        let ticks = duration.as_millis().div_ceil(tick);
        ticks.clamp(1, u32::MAX as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_component() {
        let config = DispatcherConfig::default();
        assert_eq!(config.sender, BusMember::ESP_CLIENT);
        assert_eq!(config.drain_interval_ms(), 50);
        assert_eq!(config.ticks_for(config.confirm_delay), 10);
    }

    #[test]
    fn ticks_round_up() {
        let config = DispatcherConfig::default();
        assert_eq!(config.ticks_for(Duration::from_millis(0)), 1);
        assert_eq!(config.ticks_for(Duration::from_millis(51)), 2);
        assert_eq!(config.ticks_for(Duration::from_secs(60)), 1200);

        let zero = config.with_drain_interval(Duration::from_millis(0));
        assert_eq!(zero.drain_interval_ms(), 1);
    }

    #[test]
    fn range_is_ordered() {
        let config = WatcherConfig::new(BusMember::HK1, 5).range(30.0, 5.0);
        assert_eq!(config.range, Some((5.0, 30.0)));
    }
}
