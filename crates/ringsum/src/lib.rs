//! ringsum - Paced Producer/Consumer over a Bounded Ring Buffer
//!
//! One producer reads `value producer_delay consumer_delay log_mode` records,
//! paces itself, and pushes each record into a fixed-capacity ring buffer. One
//! consumer drains the ring on its own thread, paces itself per item, keeps a
//! running sum, and stops when it pops the terminator.
//!
//! # Key Features
//!
//! - Ten-slot ring with monotonic `produced`/`consumed` counters
//! - Blocking push/pop on two role-keyed condition variables
//! - Tagged [`Message`] with an explicit `Terminate` variant
//! - Typed errors for lock poisoning and closed rings, surfaced to the [`Driver`]
//!
//! # Example
//!
#![cfg_attr(not(feature = "loom"), doc = "```")]
// Under `loom` the ring only works inside `loom::model`.
#![cfg_attr(feature = "loom", doc = "```ignore")]
//! use ringsum::{Driver, ThreadSleeper};
//!
//! let input = "3 0 0 0\n5 0 0 0\n-2 0 0 0\n";
//! let mut consumer_out = Vec::new();
//!
//! let summary = Driver::new(ThreadSleeper)
//!     .run(input.as_bytes(), std::io::sink(), &mut consumer_out)
//!     .unwrap();
//!
//! assert_eq!(summary.sum, 6);
//! assert_eq!(String::from_utf8(consumer_out).unwrap(), "Final sum is 6\n");
//! ```

mod config;
mod consumer;
mod driver;
mod error;
mod input;
mod invariants;
mod message;
mod metrics;
mod producer;
mod ring;
mod sleeper;
mod sync;

pub use config::{level_filter, BUFFER_SLOTS, CONSUMER_THREAD_NAME};
pub use consumer::{Consumer, ConsumerReport, ConsumerState};
pub use driver::{Driver, RunSummary};
pub use error::{RingError, RingsumError};
pub use input::RecordReader;
pub use message::{LogMode, Message, Record};
pub use metrics::Metrics;
pub use producer::{Producer, ProducerReport};
pub use ring::{CloseOnDrop, RingBuffer};
pub use sleeper::{Sleeper, ThreadSleeper};
