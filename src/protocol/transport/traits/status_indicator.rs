//! Optional activity light, lit on every frame sent or received and turned
//! off again on the next drain tick.

/// Activity indicator (typically a status LED).
pub trait StatusIndicator {
    fn turn_on(&mut self);
    fn turn_off(&mut self);
}

/// Placeholder for hosts without an indicator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn turn_on(&mut self) {}
    fn turn_off(&mut self) {}
}
