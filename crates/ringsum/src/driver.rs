use crate::config::CONSUMER_THREAD_NAME;
use crate::consumer::{Consumer, ConsumerReport};
use crate::error::RingsumError;
use crate::input::RecordReader;
use crate::message::Message;
use crate::metrics::Metrics;
use crate::producer::{Producer, ProducerReport};
use crate::ring::RingBuffer;
use crate::sleeper::Sleeper;
use std::io::{BufRead, Write};
use std::thread;
use tracing::{debug, info};

/// Result of a run in which the consumer reached the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records read from input and pushed.
    pub records: u64,
    /// Data messages the consumer summed.
    pub items: u64,
    /// Final running sum.
    pub sum: i64,
    /// Ring traffic, including the terminator.
    pub metrics: Metrics,
}

/// Wires one producer and one consumer to a fresh ring.
///
/// The consumer runs on a spawned thread; the producer runs on the calling
/// thread. `run` returns once both sides have stopped.
#[derive(Debug, Clone, Default)]
pub struct Driver<S> {
    sleeper: S,
}

impl<S: Sleeper + Sync> Driver<S> {
    pub fn new(sleeper: S) -> Self {
        Self { sleeper }
    }

    /// Reads records from `input` and pushes them through the ring.
    ///
    /// Producer log lines go to `producer_out`; consumer log lines and the
    /// final sum go to `consumer_out`.
    ///
    /// If either side fails, the ring is closed so the other side cannot stay
    /// blocked, and the originating error is returned.
    pub fn run<R, P, C>(
        &self,
        input: R,
        producer_out: P,
        consumer_out: C,
    ) -> Result<RunSummary, RingsumError>
    where
        R: BufRead,
        P: Write,
        C: Write + Send,
    {
        let ring: RingBuffer<Message> = RingBuffer::new();
        let ring = &ring;
        let sleeper = &self.sleeper;

        thread::scope(|scope| -> Result<RunSummary, RingsumError> {
            let consumer = thread::Builder::new()
                .name(CONSUMER_THREAD_NAME.to_owned())
                .spawn_scoped(scope, move || {
                    // Releases a producer blocked on a full ring if we exit early.
                    let _close = ring.close_on_drop();
                    Consumer::new(ring, sleeper, consumer_out).run()
                })
                .map_err(RingsumError::Spawn)?;

            // Releases the consumer if the producer side unwinds; on a normal
            // run it drops after the join below.
            let _close = ring.close_on_drop();
            let produced = Producer::new(ring, sleeper, producer_out).run(RecordReader::new(input));
            if let Err(err) = &produced {
                debug!(error = %err, "producer stopped early, closing ring");
                ring.close();
            }

            let consumed = consumer.join().map_err(|_| RingsumError::Join)?;
            if let Err(err) = &consumed {
                debug!(error = %err, "consumer stopped early");
            }

            let (producer, consumer) = settle(produced, consumed)?;
            let metrics = ring.metrics()?;
            info!(
                records = producer.records,
                items = consumer.items,
                sum = consumer.sum,
                producer_waits = metrics.producer_waits,
                consumer_waits = metrics.consumer_waits,
                "run complete"
            );

            Ok(RunSummary {
                records: producer.records,
                items: consumer.items,
                sum: consumer.sum,
                metrics,
            })
        })
    }
}

/// Picks the error to report when one or both sides failed.
///
/// A side that only saw the ring closed by its peer is reporting a
/// consequence, so the peer's error wins.
fn settle(
    produced: Result<ProducerReport, RingsumError>,
    consumed: Result<ConsumerReport, RingsumError>,
) -> Result<(ProducerReport, ConsumerReport), RingsumError> {
    match (produced, consumed) {
        (Ok(producer), Ok(consumer)) => Ok((producer, consumer)),
        (Err(producer_err), Err(consumer_err)) if producer_err.is_peer_closed() => {
            Err(consumer_err)
        }
        (Err(err), _) | (_, Err(err)) => Err(err),
    }
}
