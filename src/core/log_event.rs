//! Event envelope carrying a record through dispatch

use super::log_record::LogRecord;
use super::severity::Severity;

/// Name of the channel every log event is published on.
pub const LOG_CHANNEL: &str = "log";

/// A non-cancelable envelope around exactly one [`LogRecord`].
///
/// One event is built per emission and shared (`Arc<LogEvent>`) by every
/// handler that observes it.
#[derive(Debug, Clone)]
pub struct LogEvent {
    record: LogRecord,
}

impl LogEvent {
    pub fn new(record: LogRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &LogRecord {
        &self.record
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.record.severity()
    }

    pub fn channel(&self) -> &'static str {
        LOG_CHANNEL
    }

    /// Events can never be cancelled once published.
    pub fn is_cancelable(&self) -> bool {
        false
    }
}

impl From<LogRecord> for LogEvent {
    fn from(record: LogRecord) -> Self {
        Self::new(record)
    }
}
