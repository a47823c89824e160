//! Sink trait for handler output destinations

use super::{error::Result, log_event::LogEvent};

/// Receives every event a handler accepts, on the deferred turn.
///
/// Any `Fn(&LogEvent) -> Result<()>` closure is a sink:
///
/// ```
/// use rust_fanout_logger::{LogEvent, LogSink, Result};
///
/// let sink = |event: &LogEvent| -> Result<()> {
///     println!("{}", event.record().message().body());
///     Ok(())
/// };
/// assert_eq!(sink.name(), "closure");
/// ```
pub trait LogSink: Send + Sync {
    fn write(&self, event: &LogEvent) -> Result<()>;

    fn name(&self) -> &str {
        "sink"
    }
}

impl<F> LogSink for F
where
    F: Fn(&LogEvent) -> Result<()> + Send + Sync,
{
    fn write(&self, event: &LogEvent) -> Result<()> {
        self(event)
    }

    fn name(&self) -> &str {
        "closure"
    }
}
