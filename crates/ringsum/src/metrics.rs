/// Counters describing traffic through a ring buffer.
///
/// Updated under the ring lock; [`RingBuffer::metrics`](crate::RingBuffer::metrics)
/// returns a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Items written by `push`.
    pub pushed: u64,
    /// Items returned by `pop`.
    pub popped: u64,
    /// Times a producer blocked on a full ring.
    pub producer_waits: u64,
    /// Times a consumer blocked on an empty ring.
    pub consumer_waits: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items pushed but not yet popped.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.pushed - self.popped
    }
}
