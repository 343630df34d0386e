//! # Quickstart Example
//!
//! Minimal example demonstrating the basics of elster-can:
//! - Decode a controller response
//! - Encode register values and read/write requests
//! - Register watchers and run a simulated exchange with a controller
//!
//! This example uses `std` (tokio) in place of a CAN driver.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use elster_can::core::RegisterEncoding;
use elster_can::infra::codec::{frame, value};
use elster_can::protocol::registers::config::{DispatcherConfig, WatcherConfig};
use elster_can::protocol::registers::dispatcher::Dispatcher;
use elster_can::protocol::registers::WatcherHandle;
use elster_can::protocol::transport::bus_member::BusMember;
use elster_can::protocol::transport::can_frame::CanFrame;
use elster_can::protocol::transport::can_id::CanId;
use elster_can::protocol::transport::traits::can_bus::CanBus;
use elster_can::protocol::transport::traits::status_indicator::NoIndicator;
use std::collections::VecDeque;

/// Bus printing every frame sent and answering reads like a boiler would.
struct SimulatedBus {
    answers: VecDeque<CanFrame>,
}

impl CanBus for SimulatedBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        println!("   TX{}", frame);
        let decoded = frame.decode();
        if decoded.kind == frame::MessageKind::Request {
            if let Some(index) = decoded.elster_index {
                // Outside temperature 15.0 °C, everything else 42.
                let raw = if index == 0x000C { 150 } else { 42 };
                let member = BusMember::KESSEL;
                let [id_hi, id_lo] = member.response_id().to_be_bytes();
                let [idx_hi, idx_lo] = index.to_be_bytes();
                let [val_hi, val_lo] = u16::to_be_bytes(raw);
                self.answers.push_back(CanFrame::new(
                    member.can_id(),
                    &[id_hi, id_lo, 0xFA, idx_hi, idx_lo, val_hi, val_lo],
                ));
            }
        }
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        self.answers.pop_front().ok_or(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== elster-can Quickstart ===\n");

    // ======================================================================
    // 1. Decode a response frame
    // ======================================================================
    println!("1. Decoding a response");

    let response = CanFrame::new(CanId(0x180), &[0x02, 0x00, 0xFA, 0x00, 0x10, 0x00, 0x96]);
    let decoded = response.decode();
    println!("   Frame: {}", response);
    println!("   Kind: {:?}", decoded.kind);
    println!("   Elster index: {:?}", decoded.elster_index);
    println!(
        "   Value (DEC): {}\n",
        value::decode(RegisterEncoding::Dec, frame::value_raw(&response))
    );

    // ======================================================================
    // 2. Encode values and requests
    // ======================================================================
    println!("2. Encoding");

    let raw = value::encode(RegisterEncoding::Cent, 23.45);
    println!("   23.45 as CENT: 0x{:04X}", raw);
    let read = frame::encode_read(&BusMember::ESP_CLIENT, &BusMember::KESSEL, 0x000C);
    println!("   Read request:  {}", read);
    let write = frame::encode_write(
        &BusMember::ESP_CLIENT,
        &BusMember::HK1,
        0x0005,
        value::encode(RegisterEncoding::Dec, 21.0),
    );
    println!("   Write request: {}", write);
    let encoding: RegisterEncoding = "inv triple".parse().unwrap_or_default();
    println!(
        "   {} spans {} registers\n",
        encoding,
        encoding.word_count()
    );

    // ======================================================================
    // 3. Watch registers
    // ======================================================================
    println!("3. Dispatcher exchange");

    let mut bus = SimulatedBus {
        answers: VecDeque::new(),
    };
    let mut dispatcher = Dispatcher::<NoIndicator, 4, 8>::new(DispatcherConfig::default());
    let outside = dispatcher
        .register_sensor(WatcherConfig::new(BusMember::KESSEL, 0x000C).encoding(RegisterEncoding::Dec))
        .expect("registry has room");
    let heat = dispatcher
        .register_sensor(WatcherConfig::new(BusMember::KESSEL, 0x092A).encoding(RegisterEncoding::Double))
        .expect("registry has room");

    let mut sink = |watcher: WatcherHandle, value: f32| {
        let name = if watcher == outside {
            "outside temperature"
        } else if watcher == heat {
            "heat meter"
        } else {
            "unknown"
        };
        println!("   -> {}: {}", name, value);
    };

    while dispatcher.tick(&mut bus).await.unwrap_or(None).is_some() {
        while let Ok(answer) = bus.recv().await {
            println!("   RX{}", answer);
            dispatcher.handle_frame(&answer, &mut sink);
        }
    }

    println!("\n=== Done ===");
}
