//! Error types for ring and pipeline operations.

use std::io;
use thiserror::Error;

/// Errors returned by [`RingBuffer`](crate::RingBuffer) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// A thread panicked while holding the ring lock.
    #[error("ring buffer lock poisoned")]
    Poisoned,

    /// The ring has been closed and cannot make further progress.
    #[error("ring buffer is closed")]
    Closed,
}

/// Errors that end a producer, consumer, or whole run.
#[derive(Debug, Error)]
pub enum RingsumError {
    /// Synchronization on the shared ring failed.
    #[error(transparent)]
    Ring(#[from] RingError),

    /// Writing a log line failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The consumer thread could not be started.
    #[error("couldn't create consumer thread: {0}")]
    Spawn(#[source] io::Error),

    /// The consumer thread panicked and could not be joined cleanly.
    #[error("couldn't join with consumer thread")]
    Join,
}

impl RingsumError {
    /// Returns `true` if this error only reports that the peer closed the ring.
    ///
    /// Such an error is a consequence of a failure on the other side, not a
    /// root cause.
    #[inline]
    pub fn is_peer_closed(&self) -> bool {
        matches!(self, Self::Ring(RingError::Closed))
    }
}
