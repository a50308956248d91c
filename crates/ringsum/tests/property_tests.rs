//! Property-based tests for the ring buffer and the summing pipeline.
//!
//! Coverage:
//! - `RingBuffer<T, N>` ordering and occupancy under arbitrary op sequences
//! - `Producer`/`Consumer` termination and sum correctness via `Driver`

#![cfg(not(feature = "loom"))]

use proptest::prelude::*;
use ringsum::{Driver, Message, Producer, Record, RingBuffer, ThreadSleeper, BUFFER_SLOTS};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

// =============================================================================
// FIFO Ordering
// "pop returns items in exactly the order they were pushed"
// =============================================================================

proptest! {
    #[test]
    fn prop_fifo_single_thread(items in prop::collection::vec(any::<i64>(), 0..=BUFFER_SLOTS)) {
        let ring: RingBuffer<i64> = RingBuffer::new();

        for &item in &items {
            ring.push(item).unwrap();
        }

        let mut popped = Vec::with_capacity(items.len());
        while !ring.is_empty().unwrap() {
            popped.push(ring.pop().unwrap());
        }

        prop_assert_eq!(popped, items);
    }

    #[test]
    fn prop_fifo_across_threads(items in prop::collection::vec(any::<u32>(), 0..200)) {
        let ring = Arc::new(RingBuffer::<u32, 3>::new());
        let expected = items.len();

        let consumer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || (0..expected).map(|_| ring.pop().unwrap()).collect::<Vec<_>>())
        };

        for &item in &items {
            ring.push(item).unwrap();
        }

        prop_assert_eq!(consumer.join().unwrap(), items);
    }
}

// =============================================================================
// Bounded Count
// "0 ≤ produced - consumed ≤ capacity"
// =============================================================================

proptest! {
    /// Interleaves pushes and pops without ever blocking, checking occupancy
    /// and order against a VecDeque model after every step.
    #[test]
    fn prop_bounded_count(ops in prop::collection::vec(any::<bool>(), 1..200)) {
        let ring = RingBuffer::<u64, 4>::new();
        let mut model = VecDeque::new();
        let mut next = 0u64;

        for push in ops {
            if push && model.len() < ring.capacity() {
                ring.push(next).unwrap();
                model.push_back(next);
                next += 1;
            } else if let Some(expected) = model.pop_front() {
                prop_assert_eq!(ring.pop().unwrap(), expected);
            }

            let len = ring.len().unwrap();
            prop_assert!(len <= ring.capacity(), "len {} > capacity {}", len, ring.capacity());
            prop_assert_eq!(len, model.len());
            prop_assert_eq!(ring.is_full().unwrap(), model.len() == ring.capacity());
        }

        let metrics = ring.metrics().unwrap();
        prop_assert_eq!(metrics.in_flight(), model.len() as u64);
    }
}

// =============================================================================
// Termination
// "K data items then the terminator: exactly K items are consumed"
// =============================================================================

proptest! {
    #[test]
    fn prop_terminator_follows_all_data(values in prop::collection::vec(any::<i32>(), 0..BUFFER_SLOTS)) {
        let ring: RingBuffer<Message> = RingBuffer::new();
        let records = values.iter().map(|&v| Record::value(i64::from(v)));

        let report = Producer::new(&ring, ThreadSleeper, std::io::sink()).run(records).unwrap();
        prop_assert_eq!(report.records, values.len() as u64);

        let mut data = 0;
        loop {
            match ring.pop().unwrap() {
                Message::Data { source_line, .. } => {
                    data += 1;
                    prop_assert_eq!(source_line, data);
                }
                Message::Terminate => break,
            }
        }
        prop_assert_eq!(data, values.len() as u64);
        prop_assert!(ring.is_empty().unwrap());
    }

    #[test]
    fn prop_final_sum_matches_input(values in prop::collection::vec(-1_000_000i64..1_000_000, 0..60)) {
        let input: String = values.iter().map(|v| format!("{} 0 0 0\n", v)).collect();
        let mut out = Vec::new();

        let summary = Driver::new(ThreadSleeper)
            .run(input.as_bytes(), std::io::sink(), &mut out)
            .unwrap();

        let expected: i64 = values.iter().sum();
        prop_assert_eq!(summary.items, values.len() as u64);
        prop_assert_eq!(summary.sum, expected);
        prop_assert_eq!(String::from_utf8(out).unwrap(), format!("Final sum is {}\n", expected));
    }
}
