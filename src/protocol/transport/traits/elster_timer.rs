//! Asynchronous timer abstraction pacing the request-queue drain.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait ElsterTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(
        &'a mut self,
        millis: u32,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
