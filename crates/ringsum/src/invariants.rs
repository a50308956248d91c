//! Debug assertion macros for ring buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing for them.
//!
//! Used by `RingBuffer<T, N>`.

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the number of buffered items does not exceed capacity.
///
/// **Invariant**: `0 ≤ (produced - consumed) ≤ capacity`
///
/// Used in: `push()` after incrementing `produced`
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded count violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that the consumer cursor never passes the producer cursor.
///
/// **Invariant**: `consumed ≤ produced` (after increment)
///
/// Used in: `pop()` after incrementing `consumed`
macro_rules! debug_assert_consumed_not_past_produced {
    ($consumed:expr, $produced:expr) => {
        debug_assert!(
            $consumed <= $produced,
            "bounded count violated: consumed {} beyond produced {}",
            $consumed,
            $produced
        )
    };
}

// =============================================================================
// Monotonic Progress
// =============================================================================

/// Assert that a counter only increases, by exactly one per operation.
///
/// **Invariant**: `new == old + 1`
///
/// Used in: `push()` for `produced`, `pop()` for `consumed`
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new == $old + 1,
            "monotonic progress violated: {} went from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

// =============================================================================
// Initialized Range
// =============================================================================

/// Assert that we're reading a slot that holds a live item.
///
/// **Invariant**: `slot(seq) is initialized ⟺ consumed ≤ seq < produced`
///
/// Used in: `pop()` before `assume_init_read()`
macro_rules! debug_assert_initialized_read {
    ($seq:expr, $consumed:expr, $produced:expr) => {
        debug_assert!(
            $seq >= $consumed && $seq < $produced,
            "initialized range violated: reading seq {} outside [{}, {})",
            $seq,
            $consumed,
            $produced
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_consumed_not_past_produced;
pub(crate) use debug_assert_initialized_read;
pub(crate) use debug_assert_monotonic;
