//! Outbound request queue. Read requests are not sent when they are issued:
//! they wait here and leave one per drain tick, so a burst of polls never
//! floods the bus.
use crate::error::QueueError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;
use heapless::Deque;

/// Bounded FIFO of frames waiting for their drain tick.
#[derive(Debug)]
pub struct RequestQueue<const Q: usize> {
    pending: Deque<CanFrame, Q>,
}

impl<const Q: usize> Default for RequestQueue<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const Q: usize> RequestQueue<Q> {
    /// Instantiate an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Number of frames waiting.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        Q - self.pending.len()
    }

    /// Append one frame.
    pub fn enqueue(&mut self, frame: CanFrame) -> Result<(), QueueError> {
        self.pending
            .push_back(frame)
            .map_err(|_| QueueError::Full { capacity: Q })
    }

    /// Append a group of frames, either all of them or none.
    pub fn enqueue_all<I>(&mut self, frames: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = CanFrame>,
        I::IntoIter: ExactSizeIterator,
    {
        let frames = frames.into_iter();
        if frames.len() > self.remaining() {
            return Err(QueueError::Full { capacity: Q });
        }
        for frame in frames {
            self.enqueue(frame)?;
        }
        Ok(())
    }

    /// Remove the oldest frame.
    #[inline]
    pub fn pop(&mut self) -> Option<CanFrame> {
        self.pending.pop_front()
    }

    /// Oldest frame, left in place.
    #[inline]
    pub fn peek(&self) -> Option<&CanFrame> {
        self.pending.front()
    }

    /// Drop every pending frame.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Send the oldest frame, if any. A frame whose transmission fails is
    /// dropped: the next poll of its watcher issues a fresh request.
    pub async fn drain_one<C: CanBus>(&mut self, can_bus: &mut C) -> Result<Option<CanFrame>, C::Error>
    where
        C::Error: core::fmt::Debug,
    {
        let Some(frame) = self.pending.pop_front() else {
            return Ok(None);
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("TX {}", defmt::Display2Format(&frame));

        can_bus.send(&frame).await?;
        Ok(Some(frame))
    }
}
