//! Register layer: watchers bound to one Elster register each, the dispatcher
//! routing bus traffic to them, and the runner driving everything from a
//! single task.
pub mod config;
pub mod dispatcher;
pub mod service;
pub mod watcher;

/// Capability of a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatcherKind {
    /// Sensor: polls and publishes.
    ReadOnly,
    /// Number: additionally accepts control requests.
    Writable,
}

/// Stable reference to a registered watcher, handed out by the dispatcher
/// and passed back to the [`ValueSink`](crate::protocol::transport::traits::value_sink::ValueSink)
/// with every published value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatcherHandle {
    kind: WatcherKind,
    slot: u8,
}

impl WatcherHandle {
    pub(crate) const fn new(kind: WatcherKind, slot: u8) -> Self {
        Self { kind, slot }
    }

    #[inline]
    pub const fn kind(&self) -> WatcherKind {
        self.kind
    }

    /// Position within the registry of its kind (registration order).
    #[inline]
    pub const fn slot(&self) -> usize {
        self.slot as usize
    }
}
