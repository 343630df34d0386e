//! Register watcher: owns one Elster register (or two/three consecutive ones
//! for the combined kinds), issues its read requests, and turns matching
//! responses into published values.
//!
//! ```text
//!            begin_read_cycle()                 last word received
//!   Idle ─────────────────────────> AwaitingWords ──────────────────> Idle
//!    ^  (single-word: stays Idle)        │ begin_read_cycle(): slots reset
//!    └───────────────────────────────────┘
//! Failed: writable + multi-word, set at construction, never left.
//! ```
use crate::core::RegisterEncoding;
use crate::error::{ControlError, QueueError};
use crate::infra::codec::{frame, value};
use crate::protocol::registers::config::WatcherConfig;
use crate::protocol::registers::WatcherKind;
use crate::protocol::transport::bus_member::BusMember;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::request_queue::RequestQueue;
use embassy_time::Duration;

/// What a watcher is allowed to do besides reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    ReadOnly,
    /// Accepts control requests within `[min, max]`.
    Writable { min: f32, max: f32 },
}

/// Lifecycle of a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatcherState {
    Idle,
    /// Multi-word read cycle in progress.
    AwaitingWords,
    /// Unsupported configuration: skipped by the dispatcher for good.
    Failed,
}

/// Watcher of a single register.
#[derive(Debug, Clone)]
pub struct RegisterWatcher {
    target: BusMember,
    elster_index: u16,
    encoding: RegisterEncoding,
    capability: Capability,
    poll_interval: Option<Duration>,
    state: WatcherState,
    partial: [f32; 3],
    last_published: Option<f32>,
}

impl RegisterWatcher {
    /// Build a watcher from its configuration.
    ///
    /// A writable watcher on a double/triple register is created in the
    /// [`WatcherState::Failed`] state: combined registers cannot be written.
    pub fn new(config: &WatcherConfig, kind: WatcherKind) -> Self {
        let capability = match kind {
            WatcherKind::ReadOnly => Capability::ReadOnly,
            WatcherKind::Writable => {
                let (min, max) = config.range.unwrap_or((f32::NEG_INFINITY, f32::INFINITY));
                Capability::Writable { min, max }
            }
        };

        let state = if kind == WatcherKind::Writable && config.encoding.is_multi_word() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{} 0x{:04x}: combined entities (double / triple) are not supported",
                config.target.name(),
                config.elster_index
            );
            WatcherState::Failed
        } else {
            WatcherState::Idle
        };

        Self {
            target: config.target,
            elster_index: config.elster_index,
            encoding: config.encoding,
            capability,
            poll_interval: config.poll_interval,
            state,
            partial: [f32::NAN; 3],
            last_published: None,
        }
    }

    #[inline]
    pub fn target(&self) -> &BusMember {
        &self.target
    }

    #[inline]
    pub fn elster_index(&self) -> u16 {
        self.elster_index
    }

    #[inline]
    pub fn encoding(&self) -> RegisterEncoding {
        self.encoding
    }

    #[inline]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    #[inline]
    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Configured poll interval, `None` when the kind default applies.
    #[inline]
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.state == WatcherState::Failed
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        matches!(self.capability, Capability::Writable { .. })
    }

    /// Last value handed to the sink, NaN included.
    #[inline]
    pub fn last_published(&self) -> Option<f32> {
        self.last_published
    }

    /// Display precision of published values.
    #[inline]
    pub fn accuracy_decimals(&self) -> u8 {
        self.encoding.decimal_scale()
    }

    /// Increment of a control request.
    #[inline]
    pub fn step(&self) -> f32 {
        self.encoding.step()
    }

    /// Words collected during the current read cycle, lowest index first.
    #[inline]
    pub fn partial_values(&self) -> &[f32] {
        &self.partial[..self.encoding.word_count() as usize]
    }

    /// True when `elster_index` belongs to this watcher's register range.
    pub fn covers(&self, elster_index: u16) -> bool {
        self.word_offset(elster_index).is_some()
    }

    /// True when both watchers combine words and would take responses from
    /// the same member at a shared index.
    ///
    /// Single-word watchers may share an index with anything: they never
    /// hold partial words.
    pub fn overlaps(&self, other: &RegisterWatcher) -> bool {
        if self.is_failed() || other.is_failed() {
            return false;
        }
        if !self.encoding.is_multi_word() || !other.encoding.is_multi_word() {
            return false;
        }
        self.target.can_id() == other.target.can_id()
            && (self.covers(other.elster_index) || other.covers(self.elster_index))
    }

    /// Queue one read request per word, at consecutive indices, and forget
    /// the words of any previous cycle.
    ///
    /// The requests are queued all together or not at all. A failed watcher
    /// queues nothing.
    pub fn begin_read_cycle<const Q: usize>(
        &mut self,
        sender: &BusMember,
        queue: &mut RequestQueue<Q>,
    ) -> Result<(), QueueError> {
        if self.is_failed() {
            return Ok(());
        }

        self.partial = [f32::NAN; 3];
        if self.encoding.is_multi_word() {
            self.state = WatcherState::AwaitingWords;
        }

        let target = self.target;
        let first = self.elster_index;
        queue.enqueue_all(
            (0..self.encoding.word_count() as u16)
                .map(|offset| frame::encode_read(sender, &target, first.wrapping_add(offset))),
        )
    }

    /// Offer a received frame. Returns the value to publish, if any.
    ///
    /// Only frames carrying the target's identifier and an index within the
    /// register range are considered; the message kind is the dispatcher's
    /// concern. A single-word register publishes every match, NaN included.
    /// A combined register stores the word and publishes each time the
    /// combination is finite; a missing word publishes NaN and stays unset.
    pub fn on_frame(&mut self, frame: &CanFrame) -> Option<f32> {
        if self.is_failed() || frame.id != self.target.can_id() {
            return None;
        }

        let decoded = frame.decode();
        let offset = self.word_offset(decoded.elster_index?)?;
        let raw = frame::value_raw(frame);

        if !self.encoding.is_multi_word() {
            return Some(self.publish(value::decode(self.encoding, raw)));
        }

        let word = value::decode_word(raw);
        self.partial[offset] = word;
        if word.is_nan() {
            return Some(self.publish(f32::NAN));
        }

        if self.partial_values().iter().all(|w| !w.is_nan()) {
            self.state = WatcherState::Idle;
        }

        let combined = value::combine(self.encoding, &self.partial);
        combined.is_finite().then(|| self.publish(combined))
    }

    /// Validate a control request and build its write frame.
    pub fn write_frame<E: core::fmt::Debug>(
        &self,
        sender: &BusMember,
        requested: f32,
    ) -> Result<CanFrame, ControlError<E>> {
        let Capability::Writable { min, max } = self.capability else {
            return Err(ControlError::NotWritable);
        };
        if self.is_failed() {
            return Err(ControlError::Disabled);
        }
        if !requested.is_finite() {
            return Err(ControlError::NotFinite);
        }
        if requested < min || requested > max {
            return Err(ControlError::OutOfRange {
                value: requested,
                min,
                max,
            });
        }

        let raw = value::encode(self.encoding, requested);
        Ok(frame::encode_write(sender, &self.target, self.elster_index, raw))
    }

    fn publish(&mut self, published: f32) -> f32 {
        self.last_published = Some(published);
        published
    }

    fn word_offset(&self, elster_index: u16) -> Option<usize> {
        let offset = elster_index.wrapping_sub(self.elster_index);
        (offset < self.encoding.word_count() as u16).then_some(offset as usize)
    }
}
