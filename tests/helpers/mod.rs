/// Test doubles to simulate the CAN bus, the timer and the status light
/// during integration tests.
use elster_can::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, elster_timer::ElsterTimer, status_indicator::StatusIndicator},
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (DUT ↔ controller).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_bus = Self {
            tx: dut_tx,
            rx: Arc::new(Mutex::new(dut_rx)),
        };

        let host_bus = Self {
            tx: host_tx,
            rx: Arc::new(Mutex::new(host_rx)),
        };

        (dut_bus, host_bus)
    }

    /// Frame already delivered to this end, without waiting.
    pub fn try_recv(&self) -> Option<CanFrame> {
        let mut rx = self.rx.try_lock().ok()?;
        rx.try_recv().ok()
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive the drain tick in tests.
pub struct MockTimer;

impl ElsterTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Status light counting its transitions; clones share the counters.
pub struct CountingIndicator {
    on: Arc<AtomicU32>,
    off: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl CountingIndicator {
    pub fn turned_on(&self) -> u32 {
        self.on.load(Ordering::SeqCst)
    }

    pub fn turned_off(&self) -> u32 {
        self.off.load(Ordering::SeqCst)
    }
}

impl StatusIndicator for CountingIndicator {
    fn turn_on(&mut self) {
        self.on.fetch_add(1, Ordering::SeqCst);
    }

    fn turn_off(&mut self) {
        self.off.fetch_add(1, Ordering::SeqCst);
    }
}

#[allow(dead_code)]
/// Response frame of `member` for `elster_index`, as the controller sends it.
pub fn response(
    member: &elster_can::protocol::transport::bus_member::BusMember,
    elster_index: u16,
    raw: u16,
) -> CanFrame {
    let [id_hi, id_lo] = member.response_id().to_be_bytes();
    let [idx_hi, idx_lo] = elster_index.to_be_bytes();
    let [val_hi, val_lo] = raw.to_be_bytes();
    CanFrame::new(
        member.can_id(),
        &[id_hi, id_lo, 0xFA, idx_hi, idx_lo, val_hi, val_lo],
    )
}
