//! Core logger types and traits

pub mod channel;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod host;
pub mod log_event;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod render;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use channel::{EventBus, Listener, SubscriptionId};
pub use dispatch::{Dispatcher, Scheduler, Task, TaskQueue, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use handler::{HandlerConfig, Lifecycle, LogHandler, MessageObserver, Policy};
pub use host::{Host, HostProbe, PROCESS_TYPE_ENV};
pub use log_event::{LogEvent, LOG_CHANNEL};
pub use log_record::{LogMessage, LogRecord, MessageOptions, SERIALIZATION_FALLBACK};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::HandlerMetrics;
pub use render::{strip_ansi, Renderer};
pub use severity::{name_to_severity, severity_to_name, LevelSpec, Severity};
pub use sink::LogSink;
pub use timestamp::TimestampFormat;
