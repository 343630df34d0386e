//! Dispatcher: owns the watcher registries and the request queue, routes
//! received frames, and paces polls, confirmations and the outbound drain.
//!
//! Everything advances through [`Dispatcher::tick`], called once per drain
//! interval by the host (or by [`RegisterRunner`](super::service::RegisterRunner)).
//! Poll intervals and confirmation delays are counted in ticks.
//!
//! ```rust,ignore
//! let mut dispatcher: Dispatcher = Dispatcher::new(DispatcherConfig::default());
//! let outside = dispatcher.register_sensor(
//!     WatcherConfig::new(BusMember::KESSEL, 0x000C).encoding(RegisterEncoding::Dec),
//! )?;
//!
//! loop {
//!     // every 50 ms
//!     dispatcher.tick(&mut can_bus).await?;
//!     // on every received frame
//!     dispatcher.handle_frame(&frame, &mut |watcher: WatcherHandle, value: f32| publish(watcher, value));
//! }
//! ```
use crate::error::{ControlError, RefreshError, RegistryError};
use crate::infra::codec::frame::MessageKind;
use crate::protocol::registers::config::{DispatcherConfig, WatcherConfig};
use crate::protocol::registers::watcher::RegisterWatcher;
use crate::protocol::registers::{WatcherHandle, WatcherKind};
use crate::protocol::transport::bus_member::BusMember;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::request_queue::RequestQueue;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::status_indicator::{NoIndicator, StatusIndicator};
use crate::protocol::transport::traits::value_sink::ValueSink;
use crate::protocol::transport::{DEFAULT_NUMBER_POLL_MS, DEFAULT_SENSOR_POLL_MS};
use embassy_time::Duration;
use heapless::Vec;

/// Registered watcher with its poll countdown.
#[derive(Debug)]
struct Entry {
    watcher: RegisterWatcher,
    period: u32,
    remaining: u32,
}

/// Confirmation read waiting for its delay to elapse.
#[derive(Debug, Clone, Copy)]
struct PendingConfirm {
    handle: WatcherHandle,
    remaining: u32,
}

/// Routing and scheduling core.
///
/// `N` bounds each registry (read-only and writable), `Q` the request queue.
pub struct Dispatcher<I: StatusIndicator = NoIndicator, const N: usize = 16, const Q: usize = 32> {
    config: DispatcherConfig,
    sensors: Vec<Entry, N>,
    numbers: Vec<Entry, N>,
    queue: RequestQueue<Q>,
    confirmations: Vec<PendingConfirm, N>,
    indicator: Option<I>,
    indicator_lit: bool,
}

impl<I: StatusIndicator, const N: usize, const Q: usize> Dispatcher<I, N, Q> {
    /// Empty dispatcher without status indicator.
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            sensors: Vec::new(),
            numbers: Vec::new(),
            queue: RequestQueue::new(),
            confirmations: Vec::new(),
            indicator: None,
            indicator_lit: false,
        }
    }

    /// Attach an activity indicator, blinked on every frame sent or received.
    pub fn with_status_indicator(mut self, indicator: I) -> Self {
        self.indicator = Some(indicator);
        self
    }

    #[inline]
    pub fn status_indicator(&self) -> Option<&I> {
        self.indicator.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    #[inline]
    pub fn sender(&self) -> &BusMember {
        &self.config.sender
    }

    /// Outbound frames waiting for their drain tick.
    #[inline]
    pub fn queue(&self) -> &RequestQueue<Q> {
        &self.queue
    }

    /// Register a read-only watcher and queue its first read cycle.
    ///
    /// Fails with [`RegistryError::Overlap`] when a combined encoding shares
    /// an index with a combined watcher already registered on the same member.
    pub fn register_sensor(&mut self, config: WatcherConfig) -> Result<WatcherHandle, RegistryError> {
        self.register(config, WatcherKind::ReadOnly)
    }

    /// Register a writable watcher and queue its first read cycle.
    ///
    /// A combined (double/triple) encoding registers successfully but the
    /// watcher stays disabled: it never polls and rejects control requests.
    /// Disabled watchers never take part in the overlap check.
    pub fn register_number(&mut self, config: WatcherConfig) -> Result<WatcherHandle, RegistryError> {
        self.register(config, WatcherKind::Writable)
    }

    pub fn watcher(&self, handle: WatcherHandle) -> Option<&RegisterWatcher> {
        self.registry(handle.kind())
            .get(handle.slot())
            .map(|entry| &entry.watcher)
    }

    /// Every registered watcher, read-only ones first, in registration order.
    pub fn watchers(&self) -> impl Iterator<Item = (WatcherHandle, &RegisterWatcher)> + '_ {
        let sensors = self.sensors.iter().enumerate().map(|(slot, entry)| {
            (WatcherHandle::new(WatcherKind::ReadOnly, slot as u8), &entry.watcher)
        });
        let numbers = self.numbers.iter().enumerate().map(|(slot, entry)| {
            (WatcherHandle::new(WatcherKind::Writable, slot as u8), &entry.watcher)
        });
        sensors.chain(numbers)
    }

    /// Queue a read cycle right away and restart the watcher's poll countdown.
    pub fn refresh(&mut self, handle: WatcherHandle) -> Result<(), RefreshError> {
        let sender = self.config.sender;
        let entry = registry_mut(&mut self.sensors, &mut self.numbers, handle.kind())
            .get_mut(handle.slot())
            .ok_or(RefreshError::UnknownWatcher)?;
        if entry.watcher.is_failed() {
            return Err(RefreshError::Disabled);
        }
        entry.remaining = entry.period;
        entry.watcher.begin_read_cycle(&sender, &mut self.queue)?;
        Ok(())
    }

    /// Route one received frame. Returns the number of values published.
    ///
    /// Only responses are routed; requests and writes seen on the bus are
    /// observed (logged) and dropped, as are frames without an elster index.
    pub fn handle_frame<S: ValueSink>(&mut self, frame: &CanFrame, sink: &mut S) -> usize {
        #[cfg(feature = "defmt")]
        defmt::debug!("RX {}", defmt::Display2Format(frame));

        self.blink();

        let decoded = frame.decode();
        if decoded.kind != MessageKind::Response || decoded.elster_index.is_none() {
            return 0;
        }

        let mut published = 0;
        for (kind, registry) in [
            (WatcherKind::ReadOnly, &mut self.sensors),
            (WatcherKind::Writable, &mut self.numbers),
        ] {
            for (slot, entry) in registry.iter_mut().enumerate() {
                if let Some(value) = entry.watcher.on_frame(frame) {
                    sink.publish(WatcherHandle::new(kind, slot as u8), value);
                    published += 1;
                }
            }
        }
        published
    }

    /// Advance the schedule by one drain interval.
    ///
    /// Turns the indicator off, starts the read cycles whose confirmation
    /// delay or poll interval has elapsed, then sends at most one queued
    /// frame. Returns the frame sent, if any.
    pub async fn tick<C: CanBus>(&mut self, can_bus: &mut C) -> Result<Option<CanFrame>, C::Error> {
        if self.indicator_lit {
            if let Some(indicator) = self.indicator.as_mut() {
                indicator.turn_off();
            }
            self.indicator_lit = false;
        }

        self.advance_confirmations();

        let sender = self.config.sender;
        advance_polls(&mut self.sensors, &sender, &mut self.queue);
        advance_polls(&mut self.numbers, &sender, &mut self.queue);

        let sent = self.queue.drain_one(can_bus).await?;
        if sent.is_some() {
            self.blink();
        }
        Ok(sent)
    }

    /// Write `value` to a writable watcher's register.
    ///
    /// The write frame bypasses the request queue. A confirmation read follows
    /// after the configured delay; a repeated control restarts that delay.
    pub async fn control<C: CanBus>(
        &mut self,
        handle: WatcherHandle,
        value: f32,
        can_bus: &mut C,
    ) -> Result<(), ControlError<C::Error>> {
        if handle.kind() == WatcherKind::ReadOnly {
            return Err(ControlError::NotWritable);
        }
        let entry = self
            .numbers
            .get(handle.slot())
            .ok_or(ControlError::UnknownWatcher)?;

        let request = entry
            .watcher
            .write_frame(&self.config.sender, value)
            .inspect_err(|_err| {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "{} 0x{:04x}: control {} rejected",
                    entry.watcher.target().name(),
                    entry.watcher.elster_index(),
                    value
                );
            })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("TX {}", defmt::Display2Format(&request));

        can_bus.send(&request).await.map_err(ControlError::Send)?;
        self.blink();
        self.schedule_confirmation(handle);
        Ok(())
    }

    fn register(&mut self, config: WatcherConfig, kind: WatcherKind) -> Result<WatcherHandle, RegistryError> {
        let default_poll = match kind {
            WatcherKind::ReadOnly => DEFAULT_SENSOR_POLL_MS,
            WatcherKind::Writable => DEFAULT_NUMBER_POLL_MS,
        };
        let interval = config
            .poll_interval
            .unwrap_or(Duration::from_millis(default_poll as u64));
        let period = self.config.ticks_for(interval);

        let watcher = RegisterWatcher::new(&config, kind);
        if self
            .sensors
            .iter()
            .chain(self.numbers.iter())
            .any(|entry| entry.watcher.overlaps(&watcher))
        {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{} 0x{:04x} {} overlaps a registered watcher",
                config.target.name(),
                config.elster_index,
                config.encoding
            );
            return Err(RegistryError::Overlap);
        }

        let registry = registry_mut(&mut self.sensors, &mut self.numbers, kind);
        let slot = u8::try_from(registry.len()).map_err(|_| RegistryError::Full)?;
        registry
            .push(Entry {
                watcher,
                period,
                remaining: period,
            })
            .map_err(|_| RegistryError::Full)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "{} 0x{:04x} {} every {} ms",
            config.target.name(),
            config.elster_index,
            config.encoding,
            interval.as_millis()
        );

        let handle = WatcherHandle::new(kind, slot);
        match self.refresh(handle) {
            Ok(()) | Err(RefreshError::Disabled) => {}
            Err(_err) => {
                // The next poll retries.
                #[cfg(feature = "defmt")]
                defmt::warn!("initial read not queued: {}", _err);
            }
        }
        Ok(handle)
    }

    fn registry(&self, kind: WatcherKind) -> &Vec<Entry, N> {
        match kind {
            WatcherKind::ReadOnly => &self.sensors,
            WatcherKind::Writable => &self.numbers,
        }
    }

    fn schedule_confirmation(&mut self, handle: WatcherHandle) {
        let delay = self.config.ticks_for(self.config.confirm_delay);
        if let Some(pending) = self.confirmations.iter_mut().find(|p| p.handle == handle) {
            pending.remaining = delay;
            return;
        }
        if self
            .confirmations
            .push(PendingConfirm {
                handle,
                remaining: delay,
            })
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("confirmation read dropped: too many pending");
        }
    }

    fn advance_confirmations(&mut self) {
        let mut due: Vec<WatcherHandle, N> = Vec::new();
        self.confirmations.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(1);
            if pending.remaining == 0 {
                // Capacities match: every pending entry fits.
                let _ = due.push(pending.handle);
                false
            } else {
                true
            }
        });

        for handle in due {
            if let Err(_err) = self.refresh(handle) {
                #[cfg(feature = "defmt")]
                defmt::warn!("confirmation read not queued: {}", _err);
            }
        }
    }

    fn blink(&mut self) {
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.turn_on();
            self.indicator_lit = true;
        }
    }
}

fn registry_mut<'a, const N: usize>(
    sensors: &'a mut Vec<Entry, N>,
    numbers: &'a mut Vec<Entry, N>,
    kind: WatcherKind,
) -> &'a mut Vec<Entry, N> {
    match kind {
        WatcherKind::ReadOnly => sensors,
        WatcherKind::Writable => numbers,
    }
}

fn advance_polls<const N: usize, const Q: usize>(
    registry: &mut Vec<Entry, N>,
    sender: &BusMember,
    queue: &mut RequestQueue<Q>,
) {
    for entry in registry.iter_mut().filter(|entry| !entry.watcher.is_failed()) {
        entry.remaining = entry.remaining.saturating_sub(1);
        if entry.remaining > 0 {
            continue;
        }
        entry.remaining = entry.period;
        if let Err(_err) = entry.watcher.begin_read_cycle(sender, queue) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{} 0x{:04x}: poll skipped: {}",
                entry.watcher.target().name(),
                entry.watcher.elster_index(),
                _err
            );
        }
    }
}
