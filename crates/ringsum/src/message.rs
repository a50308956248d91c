use std::time::Duration;

/// Output request carried by each record.
///
/// Codes 1 and 3 ask the producer to log the item; codes 2 and 3 ask the
/// consumer to. Any other code is accepted and logs nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogMode(i32);

impl LogMode {
    pub const SILENT: Self = Self(0);
    pub const PRODUCER: Self = Self(1);
    pub const CONSUMER: Self = Self(2);
    pub const BOTH: Self = Self(3);

    #[inline]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Whether the producer prints a line after pushing the item.
    #[inline]
    pub const fn logs_production(self) -> bool {
        matches!(self.0, 1 | 3)
    }

    /// Whether the consumer prints a line after summing the item.
    #[inline]
    pub const fn logs_consumption(self) -> bool {
        matches!(self.0, 2 | 3)
    }
}

impl From<i32> for LogMode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

/// One parsed input record, before the producer assigns it a line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub value: i64,
    /// Pause taken by the producer before pushing this record.
    pub producer_delay: Duration,
    /// Pause taken by the consumer before summing this record.
    pub consumer_delay: Duration,
    pub log_mode: LogMode,
}

impl Record {
    pub fn new(value: i64, producer_delay_ms: u64, consumer_delay_ms: u64, log_mode: i32) -> Self {
        Self {
            value,
            producer_delay: Duration::from_millis(producer_delay_ms),
            consumer_delay: Duration::from_millis(consumer_delay_ms),
            log_mode: LogMode::new(log_mode),
        }
    }

    /// Record with no pacing and no logging.
    pub fn value(value: i64) -> Self {
        Self::new(value, 0, 0, 0)
    }
}

/// Unit of work passed from producer to consumer through the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// A value to pace on and add to the running sum.
    Data {
        value: i64,
        consumer_delay: Duration,
        /// 1-based index of the record this came from.
        source_line: u64,
        log_mode: LogMode,
    },
    /// No more data follows; the consumer prints its sum and stops.
    Terminate,
}

impl Message {
    /// Builds the data message for `record` read at `source_line`.
    pub fn data(record: &Record, source_line: u64) -> Self {
        Self::Data {
            value: record.value,
            consumer_delay: record.consumer_delay,
            source_line,
            log_mode: record.log_mode,
        }
    }

    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Terminate)
    }
}
