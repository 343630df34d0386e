//! Register-level send helpers, bypassing the dispatcher.
mod helpers;

use elster_can::core::RegisterEncoding;
use elster_can::protocol::transport::bus_member::BusMember;
use elster_can::protocol::transport::traits::elster_sender::ElsterSender;
use helpers::MockCanBus;

#[tokio::test]
async fn send_read_emits_extended_request() {
    let (mut dut_bus, host_bus) = MockCanBus::create_pair();

    let sent = dut_bus
        .send_read(&BusMember::ESP_CLIENT, &BusMember::KESSEL, 0x000C)
        .await
        .expect("mock bus accepts frames");

    let on_bus = host_bus.try_recv().expect("frame delivered");
    assert_eq!(sent, on_bus);
    assert_eq!(on_bus.id, BusMember::ESP_CLIENT.can_id());
    assert_eq!(on_bus.payload(), &[0x31, 0x00, 0xFA, 0x00, 0x0C, 0x00, 0x00]);
}

#[tokio::test]
async fn send_write_encodes_value() {
    let (mut dut_bus, host_bus) = MockCanBus::create_pair();

    dut_bus
        .send_write(
            &BusMember::ESP_CLIENT,
            &BusMember::HK1,
            0x0005,
            RegisterEncoding::Dec,
            -2.5,
        )
        .await
        .expect("mock bus accepts frames");

    let on_bus = host_bus.try_recv().expect("frame delivered");
    // -25 as a two's-complement word
    assert_eq!(on_bus.payload(), &[0xC0, 0x01, 0xFA, 0x00, 0x05, 0xFF, 0xE7]);
}

#[tokio::test]
async fn send_failure_is_returned() {
    let (mut dut_bus, host_bus) = MockCanBus::create_pair();
    drop(host_bus);

    let result = dut_bus
        .send_read(&BusMember::ESP_CLIENT, &BusMember::KESSEL, 0x000C)
        .await;
    assert_eq!(result, Err(()));
}
