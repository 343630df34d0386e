//! Collaborator traits consumed by the protocol layer: CAN bus, timer,
//! value sink, status indicator, and the register-level send helpers.
pub mod can_bus;
pub mod elster_sender;
pub mod elster_timer;
pub mod status_indicator;
pub mod value_sink;
