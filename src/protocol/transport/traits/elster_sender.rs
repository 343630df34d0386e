//! `CanBus` extension providing a register-level API: it builds the Elster
//! read/write frame for a target member and transmits it right away,
//! bypassing the request queue.
use crate::{
    core::RegisterEncoding,
    infra::codec::{frame, value},
    protocol::transport::bus_member::BusMember,
    protocol::transport::can_frame::CanFrame,
    protocol::transport::traits::can_bus::CanBus,
};

/// Trait extending `CanBus` with ergonomic register helpers.
pub trait ElsterSender: CanBus
where
    <Self as CanBus>::Error: core::fmt::Debug,
{
    /// Request the current value of `elster_index` on `target`.
    ///
    /// Returns the transmitted frame so callers can trace it.
    fn send_read<'a>(
        &'a mut self,
        sender: &'a BusMember,
        target: &'a BusMember,
        elster_index: u16,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a;

    /// Encode `value` according to `encoding` and write it to `elster_index` on `target`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use elster_can::core::RegisterEncoding;
    /// use elster_can::protocol::transport::{bus_member::BusMember, traits::elster_sender::ElsterSender};
    ///
    /// // Set the comfort temperature of heating circuit 1 to 21.5 °C
    /// can_bus
    ///     .send_write(&BusMember::ESP_CLIENT, &BusMember::HK1, 0x0005, RegisterEncoding::Dec, 21.5)
    ///     .await?;
    /// ```
    fn send_write<'a>(
        &'a mut self,
        sender: &'a BusMember,
        target: &'a BusMember,
        elster_index: u16,
        encoding: RegisterEncoding,
        value: f32,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a;
}

impl<C: CanBus> ElsterSender for C
where
    C::Error: core::fmt::Debug,
{
    fn send_read<'a>(
        &'a mut self,
        sender: &'a BusMember,
        target: &'a BusMember,
        elster_index: u16,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a {
        async move {
            let request = frame::encode_read(sender, target, elster_index);

            #[cfg(feature = "defmt")]
            defmt::debug!("TX {}", defmt::Display2Format(&request));

            self.send(&request).await?;
            Ok(request)
        }
    }

    fn send_write<'a>(
        &'a mut self,
        sender: &'a BusMember,
        target: &'a BusMember,
        elster_index: u16,
        encoding: RegisterEncoding,
        value: f32,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a {
        async move {
            let raw = value::encode(encoding, value);
            let request = frame::encode_write(sender, target, elster_index, raw);

            #[cfg(feature = "defmt")]
            defmt::debug!("TX {}", defmt::Display2Format(&request));

            self.send(&request).await?;
            Ok(request)
        }
    }
}
