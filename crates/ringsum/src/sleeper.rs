use std::thread;
use std::time::Duration;

/// Pacing strategy for the producer and consumer.
///
/// Implementations suspend the calling thread and hold no state between
/// calls. A zero duration must return immediately without yielding.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);

    /// Sleeps for `ms` milliseconds.
    #[inline]
    fn sleep_ms(&self, ms: u64) {
        self.sleep(Duration::from_millis(ms));
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Wall-clock sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    #[inline]
    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        thread::sleep(duration);
    }
}
