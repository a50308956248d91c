use crate::config::BUFFER_SLOTS;
use crate::error::RingError;
use crate::invariants::{
    debug_assert_bounded_count, debug_assert_consumed_not_past_produced,
    debug_assert_initialized_read, debug_assert_monotonic,
};
use crate::metrics::Metrics;
use crate::sync::{Condvar, Mutex, MutexGuard};
use std::mem::MaybeUninit;
use std::sync::PoisonError;
use tracing::{debug, trace};

// =============================================================================
// SYNCHRONIZATION STRATEGY
// =============================================================================
//
// All shared state (slots, both counters, the closed flag, metrics) lives in
// one `State` behind one `Mutex`. Every operation runs its whole
// check-wait-mutate-notify sequence while holding that lock.
//
// ## Sequence Numbers
//
// `produced` and `consumed` are unbounded u64 counters that are never reset.
// The slot for the k-th item is `k % N`, computed only when touching a slot.
// `produced - consumed` is the number of buffered items:
// - `== N` → full, `push` waits on `space_available`
// - `== 0` → empty, `pop` waits on `item_available`
//
// ## Role-Keyed Condition Variables
//
// `push` notifies `item_available` (wakes a consumer), `pop` notifies
// `space_available` (wakes a producer). Waiters re-check their predicate in a
// loop, so spurious wakeups are harmless.
//
// ## Closing
//
// `close()` sets `closed` and wakes every waiter on both conditions. A closed
// ring rejects pushes; pops drain what is buffered, then report `Closed`.
//
// =============================================================================

/// Bounded single-producer single-consumer ring buffer with blocking push/pop.
///
/// Holds at most `N` items (default [`BUFFER_SLOTS`]). Items come out in
/// exactly the order they went in.
pub struct RingBuffer<T, const N: usize = BUFFER_SLOTS> {
    state: Mutex<State<T, N>>,
    /// Signaled by `pop` when a slot frees up.
    space_available: Condvar,
    /// Signaled by `push` when an item lands.
    item_available: Condvar,
}

struct State<T, const N: usize> {
    /// Slot `i` is initialized iff some seq in `consumed..produced` maps to it.
    slots: [MaybeUninit<T>; N],
    produced: u64,
    consumed: u64,
    closed: bool,
    metrics: Metrics,
}

impl<T, const N: usize> State<T, N> {
    #[inline]
    fn len(&self) -> usize {
        (self.produced - self.consumed) as usize
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.produced == self.consumed
    }

    #[inline]
    fn slot(seq: u64) -> usize {
        (seq % N as u64) as usize
    }
}

impl<T, const N: usize> Drop for State<T, N> {
    fn drop(&mut self) {
        for seq in self.consumed..self.produced {
            // SAFETY: every seq in consumed..produced was written by `push`
            // and not yet read by `pop`.
            unsafe {
                self.slots[Self::slot(seq)].assume_init_drop();
            }
        }
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    const NONZERO_CAPACITY: () = assert!(N > 0, "ring buffer capacity must be non-zero");

    /// Creates an empty, open ring.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_CAPACITY;

        Self {
            state: Mutex::new(State {
                slots: std::array::from_fn(|_| MaybeUninit::uninit()),
                produced: 0,
                consumed: 0,
                closed: false,
                metrics: Metrics::new(),
            }),
            space_available: Condvar::new(),
            item_available: Condvar::new(),
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Appends `item`, blocking while the ring is full.
    ///
    /// Returns `Closed` if the ring is (or becomes, while waiting) closed; the
    /// item is dropped in that case.
    pub fn push(&self, item: T) -> Result<(), RingError> {
        let mut state = self.lock()?;

        while state.is_full() && !state.closed {
            state.metrics.producer_waits += 1;
            trace!(capacity = N, "ring full, producer waiting");
            state = self
                .space_available
                .wait(state)
                .map_err(|_| RingError::Poisoned)?;
        }

        if state.closed {
            return Err(RingError::Closed);
        }

        let seq = state.produced;
        state.slots[State::<T, N>::slot(seq)].write(item);
        state.produced = seq + 1;
        state.metrics.pushed += 1;

        debug_assert_monotonic!("produced", seq, state.produced);
        debug_assert_bounded_count!(state.len(), N);

        self.item_available.notify_one();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Removes the oldest item, blocking while the ring is empty.
    ///
    /// After `close()`, buffered items are still returned; `Closed` is
    /// reported only once the ring is empty.
    pub fn pop(&self) -> Result<T, RingError> {
        let mut state = self.lock()?;

        while state.is_empty() {
            if state.closed {
                return Err(RingError::Closed);
            }
            state.metrics.consumer_waits += 1;
            trace!("ring empty, consumer waiting");
            state = self
                .item_available
                .wait(state)
                .map_err(|_| RingError::Poisoned)?;
        }

        let seq = state.consumed;
        debug_assert_initialized_read!(seq, state.consumed, state.produced);

        // SAFETY: consumed < produced, so this slot was written by `push` and
        // has not been read since. Advancing `consumed` below marks it vacant.
        let item = unsafe { state.slots[State::<T, N>::slot(seq)].assume_init_read() };
        state.consumed = seq + 1;
        state.metrics.popped += 1;

        debug_assert_monotonic!("consumed", seq, state.consumed);
        debug_assert_consumed_not_past_produced!(state.consumed, state.produced);

        self.space_available.notify_one();
        Ok(item)
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Closes the ring and wakes every blocked producer and consumer.
    ///
    /// Works on a poisoned ring too, so a surviving thread can always be
    /// released. Calling it again has no further effect.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.closed {
            state.closed = true;
            debug!(buffered = state.len(), "ring closed");
        }
        drop(state);

        self.space_available.notify_all();
        self.item_available.notify_all();
    }

    /// Returns a guard that closes the ring when dropped, including while
    /// unwinding from a panic.
    pub fn close_on_drop(&self) -> CloseOnDrop<'_, T, N> {
        CloseOnDrop { ring: self }
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of buffered items.
    pub fn len(&self) -> Result<usize, RingError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RingError> {
        Ok(self.lock()?.is_empty())
    }

    pub fn is_full(&self) -> Result<bool, RingError> {
        Ok(self.lock()?.is_full())
    }

    pub fn is_closed(&self) -> Result<bool, RingError> {
        Ok(self.lock()?.closed)
    }

    /// Returns a snapshot of the traffic counters.
    pub fn metrics(&self) -> Result<Metrics, RingError> {
        Ok(self.lock()?.metrics)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State<T, N>>, RingError> {
        self.state.lock().map_err(|_| RingError::Poisoned)
    }
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes its ring when dropped. See [`RingBuffer::close_on_drop`].
#[must_use = "the ring is closed as soon as the guard is dropped"]
pub struct CloseOnDrop<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
}

impl<T, const N: usize> Drop for CloseOnDrop<'_, T, N> {
    fn drop(&mut self) {
        self.ring.close();
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_ring_push_pop_fifo() {
        let ring = RingBuffer::<u64, 4>::new();

        ring.push(100).unwrap();
        ring.push(200).unwrap();
        ring.push(300).unwrap();
        assert_eq!(ring.len().unwrap(), 3);

        assert_eq!(ring.pop().unwrap(), 100);
        assert_eq!(ring.pop().unwrap(), 200);
        assert_eq!(ring.pop().unwrap(), 300);
        assert!(ring.is_empty().unwrap());
    }

    #[test]
    fn test_ring_wraps_slot_index() {
        let ring = RingBuffer::<u64, 3>::new();

        // Cycle through the slots several times with a partially full ring.
        let mut next_out = 0;
        for i in 0..20 {
            ring.push(i).unwrap();
            if ring.len().unwrap() == 2 {
                assert_eq!(ring.pop().unwrap(), next_out);
                next_out += 1;
            }
        }
        while next_out < 20 {
            assert_eq!(ring.pop().unwrap(), next_out);
            next_out += 1;
        }

        let metrics = ring.metrics().unwrap();
        assert_eq!(metrics.pushed, 20);
        assert_eq!(metrics.popped, 20);
        assert_eq!(metrics.in_flight(), 0);
    }

    #[test]
    fn test_ring_default_capacity() {
        let ring: RingBuffer<u8> = RingBuffer::new();
        assert_eq!(ring.capacity(), BUFFER_SLOTS);

        for i in 0..BUFFER_SLOTS as u8 {
            ring.push(i).unwrap();
        }
        assert!(ring.is_full().unwrap());
    }

    #[test]
    fn test_push_blocks_when_full() {
        let ring = Arc::new(RingBuffer::<u64, 2>::new());
        ring.push(1).unwrap();
        ring.push(2).unwrap();

        let pushed = Arc::new(AtomicBool::new(false));
        let handle = {
            let ring = Arc::clone(&ring);
            let pushed = Arc::clone(&pushed);
            thread::spawn(move || {
                ring.push(3).unwrap();
                pushed.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!pushed.load(Ordering::SeqCst), "push completed on a full ring");

        assert_eq!(ring.pop().unwrap(), 1);
        handle.join().unwrap();
        assert!(pushed.load(Ordering::SeqCst));

        assert_eq!(ring.pop().unwrap(), 2);
        assert_eq!(ring.pop().unwrap(), 3);
        assert!(ring.metrics().unwrap().producer_waits >= 1);
    }

    #[test]
    fn test_pop_blocks_when_empty() {
        let ring = Arc::new(RingBuffer::<u64, 2>::new());

        let handle = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.pop())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished(), "pop returned on an empty ring");

        ring.push(42).unwrap();
        assert_eq!(handle.join().unwrap(), Ok(42));
    }

    #[test]
    fn test_close_drains_then_reports_closed() {
        let ring = RingBuffer::<u64, 4>::new();
        ring.push(1).unwrap();
        ring.push(2).unwrap();
        ring.close();

        assert!(ring.is_closed().unwrap());
        assert_eq!(ring.push(3), Err(RingError::Closed));
        assert_eq!(ring.pop(), Ok(1));
        assert_eq!(ring.pop(), Ok(2));
        assert_eq!(ring.pop(), Err(RingError::Closed));
    }

    #[test]
    fn test_close_releases_blocked_producer() {
        let ring = Arc::new(RingBuffer::<u64, 1>::new());
        ring.push(1).unwrap();

        let handle = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.push(2))
        };

        thread::sleep(Duration::from_millis(20));
        ring.close();
        assert_eq!(handle.join().unwrap(), Err(RingError::Closed));
    }

    #[test]
    fn test_close_on_drop_releases_blocked_consumer() {
        let ring = Arc::new(RingBuffer::<u64, 1>::new());

        let handle = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.pop())
        };

        {
            let _guard = ring.close_on_drop();
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(handle.join().unwrap(), Err(RingError::Closed));
    }

    #[test]
    fn test_poisoned_ring_reports_error_and_still_closes() {
        let ring = Arc::new(RingBuffer::<u64, 2>::new());

        let poisoner = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let _state = ring.state.lock().unwrap();
                panic!("poison the ring lock");
            })
        };
        assert!(poisoner.join().is_err());

        assert_eq!(ring.push(1), Err(RingError::Poisoned));
        assert_eq!(ring.pop(), Err(RingError::Poisoned));

        ring.close();
        assert_eq!(ring.is_closed(), Err(RingError::Poisoned));
    }

    #[test]
    fn test_buffered_items_dropped_with_ring() {
        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

        struct DropTracker;

        impl Drop for DropTracker {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        DROP_COUNT.store(0, Ordering::SeqCst);

        let ring = RingBuffer::<DropTracker, 4>::new();
        for _ in 0..4 {
            ring.push(DropTracker).unwrap();
        }

        // Popped items drop at the end of this statement.
        drop(ring.pop().unwrap());
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 1);

        drop(ring);
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 4);
    }
}
