//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and hand the result to
//! the matching [`Logger`](crate::Logger) method.
//!
//! # Examples
//!
//! ```
//! use rust_fanout_logger::prelude::*;
//! use rust_fanout_logger::{info, metric};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! metric!(logger, "requests_per_second={}", 1250);
//! ```

/// Log a message at an explicit severity.
///
/// Evaluates to the `Result` of [`Logger::log`](crate::Logger::log), which is
/// an error only for `Severity::Off`.
///
/// # Examples
///
/// ```
/// # use rust_fanout_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_fanout_logger::log;
/// log!(logger, Severity::Info, "Simple message").unwrap();
/// assert!(log!(logger, Severity::Off, "Never emitted").is_err());
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+), $crate::MessageOptions::default())
    };
}

/// Log a fatal message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}

/// Log an error message.
///
/// ```
/// # use rust_fanout_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_fanout_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format!($($arg)+))
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning(format!($($arg)+))
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+))
    };
}

/// Log a debug message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format!($($arg)+))
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(format!($($arg)+))
    };
}

/// Log an audit record. Only the handlers' allow-audit gates apply.
#[macro_export]
macro_rules! audit {
    ($logger:expr, $($arg:tt)+) => {
        $logger.audit(format!($($arg)+))
    };
}

/// Log a metric record. Only the handlers' allow-metric gates apply.
#[macro_export]
macro_rules! metric {
    ($logger:expr, $($arg:tt)+) => {
        $logger.metric(format!($($arg)+))
    };
}
