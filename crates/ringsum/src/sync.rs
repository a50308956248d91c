//! Lock primitives behind the ring buffer.
//!
//! With the `loom` feature the ring is built on loom's model-checked
//! `Mutex`/`Condvar`; otherwise on `std::sync`. Both expose the same
//! poisoning `LockResult` API.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};
