//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A severity name or ordinal outside the eight named levels
    #[error("Unrecognized log level: {0}")]
    UnrecognizedLevel(String),

    /// A custom timestamp pattern chrono cannot format
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),

    /// A sink or observer failed while a handler processed an event
    #[error("Error in log handler: {message}")]
    HandlerProcessing { message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Sink error (generic)
    #[error("Sink error: {0}")]
    SinkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unrecognized level error from the offending input
    pub fn unrecognized_level(level: impl ToString) -> Self {
        LoggerError::UnrecognizedLevel(level.to_string())
    }

    /// Create a handler processing failure
    pub fn handler_processing(message: impl Into<String>) -> Self {
        LoggerError::HandlerProcessing {
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sink error (generic)
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        LoggerError::SinkError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::unrecognized_level("verbose");
        assert!(matches!(err, LoggerError::UnrecognizedLevel(_)));

        let err = LoggerError::handler_processing("sink exploded");
        assert!(matches!(err, LoggerError::HandlerProcessing { .. }));

        let err = LoggerError::sink("closed");
        assert!(matches!(err, LoggerError::SinkError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::unrecognized_level(0x05);
        assert_eq!(err.to_string(), "Unrecognized log level: 5");

        let err = LoggerError::unrecognized_level("verbose");
        assert_eq!(err.to_string(), "Unrecognized log level: verbose");

        let err = LoggerError::handler_processing("disk full");
        assert_eq!(err.to_string(), "Error in log handler: disk full");

        let err = LoggerError::InvalidTimestampFormat("%Q".into());
        assert_eq!(err.to_string(), "Invalid timestamp format: %Q");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LoggerError::io_operation("writing to stderr", "stream unavailable", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing to stderr"));
        assert!(err.to_string().contains("stream unavailable"));
    }
}
