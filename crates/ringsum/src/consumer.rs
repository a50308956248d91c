use crate::error::RingsumError;
use crate::message::Message;
use crate::ring::RingBuffer;
use crate::sleeper::Sleeper;
use std::io::Write;
use tracing::debug;

/// Consumer lifecycle. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Running,
    Terminated,
}

/// Outcome of a consumer that reached the terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Data messages summed before the terminator.
    pub items: u64,
    pub sum: i64,
}

/// Drains the ring, pacing per item and keeping a running sum.
///
/// The per-item consumer delay is taken *after* the pop, with the lock
/// released, so the producer only ever waits on a full ring.
pub struct Consumer<'a, S, W> {
    ring: &'a RingBuffer<Message>,
    sleeper: S,
    out: W,
    sum: i64,
    items: u64,
    state: ConsumerState,
}

impl<'a, S: Sleeper, W: Write> Consumer<'a, S, W> {
    pub fn new(ring: &'a RingBuffer<Message>, sleeper: S, out: W) -> Self {
        Self {
            ring,
            sleeper,
            out,
            sum: 0,
            items: 0,
            state: ConsumerState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> ConsumerState {
        self.state
    }

    #[inline]
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Pops and handles one message.
    ///
    /// Once terminated, returns immediately without touching the ring.
    pub fn step(&mut self) -> Result<ConsumerState, RingsumError> {
        if self.state == ConsumerState::Terminated {
            return Ok(self.state);
        }

        match self.ring.pop()? {
            Message::Terminate => {
                writeln!(self.out, "Final sum is {}", self.sum)?;
                self.out.flush()?;
                self.state = ConsumerState::Terminated;
                debug!(items = self.items, sum = self.sum, "consumer received terminator");
            }
            Message::Data {
                value,
                consumer_delay,
                source_line,
                log_mode,
            } => {
                self.sleeper.sleep(consumer_delay);
                self.sum = self.sum.wrapping_add(value);
                self.items += 1;

                if log_mode.logs_consumption() {
                    writeln!(
                        self.out,
                        "Consumed {} from input line {}; sum = {}",
                        value, source_line, self.sum
                    )?;
                    self.out.flush()?;
                }
            }
        }

        Ok(self.state)
    }

    /// Runs until the terminator is consumed.
    pub fn run(mut self) -> Result<ConsumerReport, RingsumError> {
        debug!("consumer started");
        while self.step()? == ConsumerState::Running {}

        Ok(ConsumerReport {
            items: self.items,
            sum: self.sum,
        })
    }
}
