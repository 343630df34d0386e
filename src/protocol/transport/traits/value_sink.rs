//! Destination of the values produced by register watchers.
use crate::protocol::registers::WatcherHandle;

/// Receives every value a watcher publishes. NaN is a legitimate state
/// meaning "unknown".
pub trait ValueSink {
    fn publish(&mut self, watcher: WatcherHandle, value: f32);
}

impl<F: FnMut(WatcherHandle, f32)> ValueSink for F {
    fn publish(&mut self, watcher: WatcherHandle, value: f32) {
        self(watcher, value)
    }
}
