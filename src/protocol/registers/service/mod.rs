//! Register service built on top of [`Dispatcher`].
//!
//! The runner owns the bus, the timer and the value sink, and multiplexes
//! three event sources on a single task:
//!
//! * the drain tick (one [`ElsterTimer::delay_ms`] per drain interval);
//! * frames received from the bus;
//! * optionally, commands queued by other tasks through a [`RegisterHandle`].
//!
//! Firmware decides whether it needs the handle by providing a pre-allocated
//! [`embassy_sync::Channel`]. No allocation is performed by the library.
use core::fmt::Debug;

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Sender},
};
use futures_util::{future::select, future::Either, pin_mut};

use crate::error::{ControlError, RunError};
use crate::protocol::registers::dispatcher::Dispatcher;
use crate::protocol::registers::WatcherHandle;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::elster_timer::ElsterTimer;
use crate::protocol::transport::traits::status_indicator::StatusIndicator;
use crate::protocol::transport::traits::value_sink::ValueSink;

/// Command channel shared between the runner and its handles.
pub type CommandChannel<const CMD_CAP: usize> =
    Channel<CriticalSectionRawMutex, RegisterCommand, CMD_CAP>;

/// Commands queued by producer tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterCommand {
    /// Write a value to a writable watcher's register.
    Control { watcher: WatcherHandle, value: f32 },
    /// Queue a read cycle now.
    Refresh(WatcherHandle),
    /// Send a raw frame, bypassing the request queue.
    SendFrame(CanFrame),
}

/// Service assembling the runner components.
pub struct RegisterService<
    'a,
    C: CanBus,
    T: ElsterTimer,
    S: ValueSink,
    I: StatusIndicator,
    const N: usize,
    const Q: usize,
    const CMD_CAP: usize,
> {
    dispatcher: Dispatcher<I, N, Q>,
    can_bus: C,
    timer: T,
    sink: S,
    command_channel: Option<&'a CommandChannel<CMD_CAP>>,
}

impl<'a, C, T, S, I, const N: usize, const Q: usize, const CMD_CAP: usize>
    RegisterService<'a, C, T, S, I, N, Q, CMD_CAP>
where
    C: CanBus,
    T: ElsterTimer,
    S: ValueSink,
    I: StatusIndicator,
{
    /// Wrap a dispatcher whose watchers are already registered.
    pub fn new(
        dispatcher: Dispatcher<I, N, Q>,
        can_bus: C,
        timer: T,
        sink: S,
        command_channel: Option<&'a CommandChannel<CMD_CAP>>,
    ) -> Self {
        Self {
            dispatcher,
            can_bus,
            timer,
            sink,
            command_channel,
        }
    }

    /// Split into handle/runner components.
    pub fn into_parts(self) -> RegisterServiceParts<'a, C, T, S, I, N, Q, CMD_CAP> {
        let handle = self.command_channel.map(|channel| RegisterHandle {
            sender: channel.sender(),
        });
        RegisterServiceParts {
            handle,
            runner: RegisterRunner {
                dispatcher: self.dispatcher,
                can_bus: self.can_bus,
                timer: self.timer,
                sink: self.sink,
                command_channel: self.command_channel,
            },
        }
    }
}

/// Bundle returned by [`RegisterService::into_parts`].
pub struct RegisterServiceParts<'a, C, T, S, I, const N: usize, const Q: usize, const CMD_CAP: usize>
where
    C: CanBus,
    T: ElsterTimer,
    S: ValueSink,
    I: StatusIndicator,
{
    pub handle: Option<RegisterHandle<'a, CMD_CAP>>,
    pub runner: RegisterRunner<'a, C, T, S, I, N, Q, CMD_CAP>,
}

/// Runner that drives the dispatcher loop.
pub struct RegisterRunner<'a, C, T, S, I, const N: usize, const Q: usize, const CMD_CAP: usize>
where
    C: CanBus,
    T: ElsterTimer,
    S: ValueSink,
    I: StatusIndicator,
{
    dispatcher: Dispatcher<I, N, Q>,
    can_bus: C,
    timer: T,
    sink: S,
    command_channel: Option<&'a CommandChannel<CMD_CAP>>,
}

enum Event {
    Tick,
    Frame(CanFrame),
    Command(RegisterCommand),
}

impl<'a, C, T, S, I, const N: usize, const Q: usize, const CMD_CAP: usize>
    RegisterRunner<'a, C, T, S, I, N, Q, CMD_CAP>
where
    C: CanBus,
    T: ElsterTimer,
    S: ValueSink,
    I: StatusIndicator,
{
    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher<I, N, Q> {
        &self.dispatcher
    }

    /// Run until the bus fails.
    ///
    /// Frames and commands are served while the drain tick is pending, so a
    /// busy bus never delays the schedule. Rejected control requests are
    /// logged and skipped; transport errors end the loop.
    pub async fn drive(mut self) -> Result<(), RunError<C::Error>> {
        let command_channel = self.command_channel;

        loop {
            let interval = self.dispatcher.config().drain_interval_ms();
            let tick = self.timer.delay_ms(interval);
            pin_mut!(tick);

            loop {
                let event = {
                    let recv_future = self.can_bus.recv();
                    pin_mut!(recv_future);

                    match command_channel {
                        Some(cmd_ch) => {
                            let cmd_future = cmd_ch.receive();
                            pin_mut!(cmd_future);

                            let selected =
                                select(tick.as_mut(), select(recv_future, cmd_future)).await;
                            match selected {
                                Either::Left(((), _)) => Event::Tick,
                                Either::Right((Either::Left((result, _)), _)) => {
                                    Event::Frame(result.map_err(RunError::Receive)?)
                                }
                                Either::Right((Either::Right((command, _)), _)) => {
                                    Event::Command(command)
                                }
                            }
                        }
                        None => {
                            let selected = select(tick.as_mut(), recv_future).await;
                            match selected {
                                Either::Left(((), _)) => Event::Tick,
                                Either::Right((result, _)) => {
                                    Event::Frame(result.map_err(RunError::Receive)?)
                                }
                            }
                        }
                    }
                };

                match event {
                    Event::Tick => {
                        self.dispatcher
                            .tick(&mut self.can_bus)
                            .await
                            .map_err(RunError::Send)?;
                        break;
                    }
                    Event::Frame(frame) => {
                        self.dispatcher.handle_frame(&frame, &mut self.sink);
                    }
                    Event::Command(command) => {
                        handle_command(&mut self.dispatcher, &mut self.can_bus, command).await?;
                    }
                }
            }
        }
    }
}

/// Command handle (optional), cheap to copy into producer tasks.
#[derive(Clone, Copy)]
pub struct RegisterHandle<'a, const CMD_CAP: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, RegisterCommand, CMD_CAP>,
}

impl<'a, const CMD_CAP: usize> RegisterHandle<'a, CMD_CAP> {
    /// Ask the runner to write `value` to `watcher`'s register.
    pub async fn control(&self, watcher: WatcherHandle, value: f32) {
        self.sender
            .send(RegisterCommand::Control { watcher, value })
            .await;
    }

    /// Ask the runner to read `watcher`'s register now.
    pub async fn refresh(&self, watcher: WatcherHandle) {
        self.sender.send(RegisterCommand::Refresh(watcher)).await;
    }

    pub async fn send_frame(&self, frame: &CanFrame) {
        self.sender
            .send(RegisterCommand::SendFrame(frame.clone()))
            .await;
    }
}

async fn handle_command<C, I, const N: usize, const Q: usize>(
    dispatcher: &mut Dispatcher<I, N, Q>,
    can_bus: &mut C,
    command: RegisterCommand,
) -> Result<(), RunError<C::Error>>
where
    C: CanBus,
    C::Error: Debug,
    I: StatusIndicator,
{
    match command {
        RegisterCommand::Control { watcher, value } => {
            match dispatcher.control(watcher, value, can_bus).await {
                Ok(()) => Ok(()),
                Err(ControlError::Send(err)) => Err(RunError::Send(err)),
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("control ignored: {}", defmt::Debug2Format(&_err));
                    Ok(())
                }
            }
        }
        RegisterCommand::Refresh(watcher) => {
            if let Err(_err) = dispatcher.refresh(watcher) {
                #[cfg(feature = "defmt")]
                defmt::warn!("refresh ignored: {}", _err);
            }
            Ok(())
        }
        RegisterCommand::SendFrame(frame) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("TX {}", defmt::Display2Format(&frame));

            can_bus.send(&frame).await.map_err(RunError::Send)
        }
    }
}
