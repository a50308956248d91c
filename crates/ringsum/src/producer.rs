use crate::error::RingsumError;
use crate::message::{Message, Record};
use crate::ring::RingBuffer;
use crate::sleeper::Sleeper;
use std::io::Write;
use tracing::debug;

/// Outcome of a completed producer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Data records pushed, not counting the terminator.
    pub records: u64,
}

/// Feeds records into the ring, one at a time, then sends the terminator.
///
/// Each record is paced by its producer delay *before* the ring is touched,
/// so pacing never holds the lock.
pub struct Producer<'a, S, W> {
    ring: &'a RingBuffer<Message>,
    sleeper: S,
    out: W,
    line: u64,
}

impl<'a, S: Sleeper, W: Write> Producer<'a, S, W> {
    pub fn new(ring: &'a RingBuffer<Message>, sleeper: S, out: W) -> Self {
        Self {
            ring,
            sleeper,
            out,
            line: 0,
        }
    }

    /// Line number of the most recently produced record (0 before the first).
    #[inline]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Paces, pushes, and optionally logs a single record.
    pub fn produce(&mut self, record: Record) -> Result<(), RingsumError> {
        self.line += 1;
        self.sleeper.sleep(record.producer_delay);

        self.ring.push(Message::data(&record, self.line))?;

        if record.log_mode.logs_production() {
            writeln!(
                self.out,
                "Produced {} from input line {}",
                record.value, self.line
            )?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Pushes the terminator and reports how many records went through.
    pub fn finish(self) -> Result<ProducerReport, RingsumError> {
        self.ring.push(Message::Terminate)?;
        debug!(records = self.line, "producer sent terminator");
        Ok(ProducerReport { records: self.line })
    }

    /// Produces every record, then sends the terminator.
    ///
    /// Stops at the first error without sending the terminator.
    pub fn run<I>(mut self, records: I) -> Result<ProducerReport, RingsumError>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.produce(record)?;
        }
        debug!(records = self.line, "input exhausted");
        self.finish()
    }
}
