//! # Rust Fanout Logger
//!
//! A leveled, multi-handler logging core. Loggers fan each record out to an
//! ordered set of independently configured handlers; every handler filters on
//! the producer's call and renders on a deferred turn.
//!
//! ## Features
//!
//! - **Severity scale with side channels**: Fatal through Trace, plus Audit
//!   and Metric gated separately from the threshold
//! - **Non-blocking emission**: output runs on a dispatcher thread or an
//!   explicit task queue
//! - **Failure isolation**: a failing sink never reaches the producer or the
//!   other handlers
//! - **Host-aware console output**: colors and stream routing adapt to the
//!   host process
//!
//! ```
//! use rust_fanout_logger::prelude::*;
//!
//! let logger = Logger::with_namespace("api");
//! logger.info("listening on :8080");
//! logger.error_with("query failed", MessageOptions::new().kind("db").id("conn-7"));
//!
//! // Dropping the logger waits for its pending console output. A logger
//! // that stays alive can wait explicitly:
//! rust_fanout_logger::flush();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        HandlerConfig, Host, LogEvent, LogHandler, LogMessage, LogSink, Logger, LoggerBuilder,
        LoggerError, MessageOptions, Renderer, Result, Scheduler, Severity, TaskQueue,
        TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, Destination, MemoryWriter, StreamWriter};
}

pub use crate::core::{
    name_to_severity, severity_to_name, strip_ansi, Dispatcher, EventBus, HandlerConfig,
    HandlerMetrics, Host, HostProbe, LevelSpec, Lifecycle, LogEvent, LogHandler, LogMessage,
    LogRecord, LogSink, Logger, LoggerBuilder, LoggerError, MessageObserver, MessageOptions,
    Policy, Renderer, Result, Scheduler, Severity, Task, TaskQueue, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT, LOG_CHANNEL, SERIALIZATION_FALLBACK,
};
pub use sinks::{route_and_write, ConsoleSink, ConsoleWriter, Destination, MemoryWriter, StreamWriter};

/// Wait for the shared dispatcher to run everything scheduled so far.
///
/// Returns `false` if it did not finish within [`DEFAULT_SHUTDOWN_TIMEOUT`].
pub fn flush() -> bool {
    Dispatcher::global().flush()
}
