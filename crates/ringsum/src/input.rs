//! Lazy reader for whitespace-separated input records.

use crate::message::Record;
use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;
use tracing::{debug, warn};

/// Iterator over `value producer_delay_ms consumer_delay_ms log_mode` records.
///
/// Fields are whitespace-separated and may span lines. Input is read one line
/// at a time, so records are yielded as soon as they are complete.
///
/// Each field takes the leading number of its token, as `scanf` would; any
/// rest of the token is read as the next field. Iteration stops at end of
/// input, at the first field with no leading number, or at the first read
/// error. All three end the stream the same way; after
/// that the iterator keeps returning `None`.
pub struct RecordReader<R> {
    reader: R,
    line: String,
    tokens: VecDeque<String>,
    finished: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            tokens: VecDeque::new(),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Some(token);
            }

            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self
                    .tokens
                    .extend(self.line.split_whitespace().map(str::to_owned)),
                Err(err) => {
                    warn!(error = %err, "input read failed, treating as end of input");
                    return None;
                }
            }
        }
    }

    /// Parses the leading number of the next token, like `scanf`'s `%d`/`%u`.
    ///
    /// Whatever follows the number in the same token stays queued as the
    /// start of the next field. A token with no leading number ends input.
    fn field<F: FromStr>(&mut self, name: &'static str, signed: bool, first: bool) -> Option<F> {
        let Some(mut token) = self.next_token() else {
            if !first {
                debug!(field = name, "input ended inside a record");
            }
            return None;
        };

        let len = numeric_prefix_len(&token, signed);
        let parsed = token[..len].parse().ok();
        if parsed.is_none() {
            debug!(field = name, token = %token, "malformed field, ending input");
            return None;
        }

        if len < token.len() {
            self.tokens.push_front(token.split_off(len));
        }
        parsed
    }

    fn read_record(&mut self) -> Option<Record> {
        let value: i64 = self.field("value", true, true)?;
        let producer_delay_ms: u64 = self.field("producer_delay_ms", false, false)?;
        let consumer_delay_ms: u64 = self.field("consumer_delay_ms", false, false)?;
        let log_mode: i32 = self.field("log_mode", true, false)?;

        Some(Record::new(value, producer_delay_ms, consumer_delay_ms, log_mode))
    }
}

/// Length of the optional sign plus leading ASCII digits of `token`.
///
/// A `-` sign only counts when `signed`; unsigned fields reject negatives.
fn numeric_prefix_len(token: &str, signed: bool) -> usize {
    let bytes = token.as_bytes();
    let sign = match bytes.first() {
        Some(b'+') => 1,
        Some(b'-') if signed => 1,
        _ => 0,
    };
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.finished {
            return None;
        }

        let record = self.read_record();
        if record.is_none() {
            self.finished = true;
        }
        record
    }
}

impl<R: BufRead> std::iter::FusedIterator for RecordReader<R> {}
