use tracing::level_filters::LevelFilter;

/// Number of message slots in the ring; also the maximum number of
/// messages in flight between producer and consumer.
pub const BUFFER_SLOTS: usize = 10;

/// Name given to the spawned consumer thread.
pub const CONSUMER_THREAD_NAME: &str = "ringsum-consumer";

/// Maps a `-v` count to the diagnostic level written to stderr.
///
/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
pub const fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_progression() {
        assert_eq!(level_filter(0), LevelFilter::WARN);
        assert_eq!(level_filter(1), LevelFilter::INFO);
        assert_eq!(level_filter(2), LevelFilter::DEBUG);
        assert_eq!(level_filter(3), LevelFilter::TRACE);
        assert_eq!(level_filter(u8::MAX), LevelFilter::TRACE);
    }
}
