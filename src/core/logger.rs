//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    handler::{HandlerConfig, LogHandler},
    log_event::LogEvent,
    log_record::{LogMessage, LogRecord, MessageOptions},
    dispatch::DEFAULT_SHUTDOWN_TIMEOUT,
    severity::Severity,
};
use std::sync::Arc;

/// Generates the plain and `_with` emission methods for one severity.
macro_rules! severity_methods {
    ($($(#[$doc:meta])* $name:ident, $with:ident => $severity:expr;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&self, message: impl Into<LogMessage>) {
                self.emit($severity, message.into(), MessageOptions::default());
            }

            #[inline]
            pub fn $with(&self, message: impl Into<LogMessage>, options: MessageOptions) {
                self.emit($severity, message.into(), options);
            }
        )*
    };
}

/// Namespaced fan-out point over an ordered set of handlers.
///
/// Emission builds one record, wraps it in one shared event and publishes it
/// to every handler in registration order. Handlers decide on the spot;
/// rendering and I/O happen later on their schedulers, so emission never
/// blocks on output.
///
/// # Example
///
/// ```
/// use rust_fanout_logger::prelude::*;
/// use std::sync::Arc;
///
/// let queue = Arc::new(TaskQueue::new());
/// let handler = HandlerConfig::new()
///     .level(Severity::Debug)
///     .scheduler(queue.clone())
///     .build()
///     .unwrap();
///
/// let logger = Logger::with_handler(handler, Some("billing"));
/// logger.debug("invoice rendered");
/// logger.error_with("charge failed", MessageOptions::new().kind("stripe").id("ch_42"));
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(logger.level(), Some(Severity::Debug));
/// ```
pub struct Logger {
    namespace: Option<String>,
    handlers: Vec<LogHandler>,
}

impl Logger {
    /// A logger with one default handler that reports every severity to the
    /// console.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: None,
            handlers: vec![Self::default_handler()],
        }
    }

    /// Like [`Logger::new`], with a namespace shown on every line.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            handlers: vec![Self::default_handler()],
        }
    }

    /// A logger whose only handler is `handler`.
    #[must_use]
    pub fn with_handler(handler: LogHandler, namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            handlers: vec![handler],
        }
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn default_handler() -> LogHandler {
        HandlerConfig::new()
            .allow_audit(true)
            .allow_metric(true)
            .build_with_threshold(Severity::Metric)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attached handlers in registration order.
    pub fn handlers(&self) -> &[LogHandler] {
        &self.handlers
    }

    pub fn add_handler(&mut self, handler: LogHandler) {
        self.handlers.push(handler);
    }

    /// Detach the first occurrence of this very handler (by identity).
    ///
    /// Returns `false` if it was not attached. The handler itself is left
    /// untouched and may still be used elsewhere.
    pub fn remove_handler(&mut self, handler: &LogHandler) -> bool {
        match self.handlers.iter().position(|h| h.ptr_eq(handler)) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// The most permissive threshold among attached handlers, `None` when
    /// there are no handlers. Disposed handlers count as `Off`.
    pub fn level(&self) -> Option<Severity> {
        self.handlers.iter().map(LogHandler::threshold).max()
    }

    /// Whether any attached handler would accept a record of `severity`.
    ///
    /// Lets callers skip building expensive messages.
    pub fn would_report(&self, severity: Severity) -> bool {
        self.handlers.iter().any(|h| h.should_report(severity))
    }

    /// Emit at an arbitrary severity. `Off` is not a record severity and is
    /// rejected.
    pub fn log(
        &self,
        severity: Severity,
        message: impl Into<LogMessage>,
        options: MessageOptions,
    ) -> Result<()> {
        if severity == Severity::Off {
            return Err(LoggerError::unrecognized_level(severity.ordinal()));
        }
        self.emit(severity, message.into(), options);
        Ok(())
    }

    /// Publish a structured value; serialization failures render as a
    /// fallback marker instead of failing.
    pub fn log_value<T: serde::Serialize + ?Sized>(
        &self,
        severity: Severity,
        value: &T,
        options: MessageOptions,
    ) -> Result<()> {
        self.log(severity, LogMessage::structured(value), options)
    }

    fn emit(&self, severity: Severity, message: LogMessage, options: MessageOptions) {
        let record = LogRecord::new(severity, message, self.namespace.clone(), options);
        let event = Arc::new(LogEvent::new(record));

        for handler in &self.handlers {
            handler.publish(&event);
        }
    }

    severity_methods! {
        fatal, fatal_with => Severity::Fatal;
        error, error_with => Severity::Error;
        warning, warning_with => Severity::Warning;
        info, info_with => Severity::Info;
        debug, debug_with => Severity::Debug;
        trace, trace_with => Severity::Trace;
        /// Audit records bypass thresholds; only the allow-audit gate applies.
        audit, audit_with => Severity::Audit;
        /// Metric records bypass thresholds; only the allow-metric gate applies.
        metric, metric_with => Severity::Metric;
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    /// Wait (bounded) for the live handlers' pending output so records
    /// emitted just before `main` returns are not lost.
    fn drop(&mut self) {
        for handler in &self.handlers {
            if handler.is_disposed() {
                continue;
            }
            if !handler.flush_timeout(DEFAULT_SHUTDOWN_TIMEOUT) {
                eprintln!(
                    "[LOGGER WARNING] Pending output of handler '{}' was not written within {:?}.",
                    handler.sink_name(),
                    DEFAULT_SHUTDOWN_TIMEOUT
                );
            }
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_fanout_logger::prelude::*;
///
/// let audit_only = HandlerConfig::new()
///     .level(Severity::Fatal)
///     .allow_metric(false)
///     .build()
///     .unwrap();
///
/// let logger = Logger::builder()
///     .namespace("auth")
///     .handler(audit_only)
///     .build();
///
/// assert_eq!(logger.namespace(), Some("auth"));
/// assert_eq!(logger.handlers().len(), 1);
/// ```
pub struct LoggerBuilder {
    namespace: Option<String>,
    handlers: Vec<LogHandler>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            namespace: None,
            handlers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Attach a handler; handlers receive events in the order added.
    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: LogHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Build the logger. Without any handler, the default console handler is
    /// installed.
    pub fn build(self) -> Logger {
        let handlers = if self.handlers.is_empty() {
            vec![Logger::default_handler()]
        } else {
            self.handlers
        };
        Logger {
            namespace: self.namespace,
            handlers,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
