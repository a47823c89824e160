//! Log handler: filtering policy, deferred sink and lifecycle
//!
//! A handler owns a threshold and two side-channel gates. Every event
//! published to it is filtered synchronously; accepted events are handed to
//! the handler's scheduler, and the sink (plus the optional observer) runs on
//! a later turn. Failures in that deferred work are caught and reported on
//! the diagnostics stream as `Error in log handler: <message>`.

use super::{
    channel::{EventBus, SubscriptionId},
    dispatch::{panic_message, Dispatcher, Scheduler},
    error::{LoggerError, Result},
    log_event::{LogEvent, LOG_CHANNEL},
    metrics::HandlerMetrics,
    render::Renderer,
    severity::{severity_to_name, LevelSpec, Severity},
    sink::LogSink,
};
use crate::sinks::{ConsoleSink, ConsoleWriter, Destination, StreamWriter};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Callback receiving the plain (uncolored) rendering of each delivered event.
pub type MessageObserver = Arc<dyn Fn(&str, &LogEvent) + Send + Sync>;

/// The filtering rules of an active handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub threshold: Severity,
    pub allow_audit: bool,
    pub allow_metric: bool,
}

impl Policy {
    /// Audit and Metric are decided by their gates alone; every other
    /// severity passes when it is at least as severe as the threshold.
    pub fn admits(&self, severity: Severity) -> bool {
        match severity {
            Severity::Audit => self.allow_audit,
            Severity::Metric => self.allow_metric,
            Severity::Off => false,
            other => other <= self.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active(Policy),
    Disposed,
}

/// Builder for [`LogHandler`].
///
/// # Example
///
/// ```
/// use rust_fanout_logger::{HandlerConfig, Severity, TaskQueue};
/// use std::sync::Arc;
///
/// let handler = HandlerConfig::new()
///     .level("warning")
///     .allow_audit(false)
///     .scheduler(Arc::new(TaskQueue::new()))
///     .build()
///     .unwrap();
///
/// assert!(handler.should_report(Severity::Error));
/// assert!(!handler.should_report(Severity::Info));
/// assert!(!handler.should_report(Severity::Audit));
/// assert!(handler.should_report(Severity::Metric));
/// ```
pub struct HandlerConfig {
    level: Option<LevelSpec>,
    allow_audit: bool,
    allow_metric: bool,
    sink: Option<Arc<dyn LogSink>>,
    observer: Option<MessageObserver>,
    scheduler: Option<Arc<dyn Scheduler>>,
    renderer: Option<Renderer>,
    diagnostics: Option<Arc<dyn StreamWriter>>,
}

impl HandlerConfig {
    pub fn new() -> Self {
        Self {
            level: None,
            allow_audit: true,
            allow_metric: true,
            sink: None,
            observer: None,
            scheduler: None,
            renderer: None,
            diagnostics: None,
        }
    }

    /// Threshold as a name, an ordinal or a [`Severity`]. Defaults to Info.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = Some(level.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn allow_audit(mut self, allow: bool) -> Self {
        self.allow_audit = allow;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn allow_metric(mut self, allow: bool) -> Self {
        self.allow_metric = allow;
        self
    }

    /// Replace the default console sink.
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Use a sink that is shared with other handlers.
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Observe the plain-text rendering of every delivered event.
    #[must_use = "builder methods return a new value"]
    pub fn on_message<F>(mut self, observer: F) -> Self
    where
        F: Fn(&str, &LogEvent) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Where deferred deliveries run. Defaults to [`Dispatcher::global`].
    #[must_use = "builder methods return a new value"]
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Renderer for the observer text and the default console sink.
    #[must_use = "builder methods return a new value"]
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Where processing failures are reported. Defaults to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, writer: Arc<dyn StreamWriter>) -> Self {
        self.diagnostics = Some(writer);
        self
    }

    /// Resolve the level and subscribe the new handler to its channel.
    pub fn build(self) -> Result<LogHandler> {
        let threshold = match &self.level {
            Some(spec) => spec.resolve()?,
            None => Severity::Info,
        };
        Ok(self.build_with_threshold(threshold))
    }

    pub(crate) fn build_with_threshold(self, threshold: Severity) -> LogHandler {
        let policy = Policy {
            threshold,
            allow_audit: self.allow_audit,
            allow_metric: self.allow_metric,
        };
        let renderer = self.renderer.unwrap_or_else(Renderer::for_current_host);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(ConsoleSink::with_renderer(renderer.clone())));
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Dispatcher::global() as Arc<dyn Scheduler>);
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(ConsoleWriter) as Arc<dyn StreamWriter>);
        let observer = self.observer;

        let inner = Arc::new_cyclic(|weak: &Weak<HandlerInner>| {
            let bus = EventBus::new();
            let weak = weak.clone();
            let subscription = bus.subscribe(
                LOG_CHANNEL,
                Arc::new(move |event: &Arc<LogEvent>| {
                    if let Some(inner) = weak.upgrade() {
                        HandlerInner::receive(&inner, event);
                    }
                }),
            );

            HandlerInner {
                lifecycle: RwLock::new(Lifecycle::Active(policy)),
                sink,
                observer: RwLock::new(observer),
                scheduler,
                renderer,
                diagnostics,
                bus,
                subscription: Mutex::new(Some(subscription)),
                metrics: HandlerMetrics::new(),
            }
        });

        LogHandler { inner }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct HandlerInner {
    lifecycle: RwLock<Lifecycle>,
    sink: Arc<dyn LogSink>,
    observer: RwLock<Option<MessageObserver>>,
    scheduler: Arc<dyn Scheduler>,
    renderer: Renderer,
    diagnostics: Arc<dyn StreamWriter>,
    bus: EventBus,
    subscription: Mutex<Option<SubscriptionId>>,
    metrics: HandlerMetrics,
}

impl HandlerInner {
    fn should_report(&self, severity: Severity) -> bool {
        match *self.lifecycle.read() {
            Lifecycle::Active(policy) => policy.admits(severity),
            Lifecycle::Disposed => false,
        }
    }

    fn is_disposed(&self) -> bool {
        matches!(*self.lifecycle.read(), Lifecycle::Disposed)
    }

    /// Synchronous half: filter, then defer.
    fn receive(self: &Arc<Self>, event: &Arc<LogEvent>) {
        if !self.should_report(event.severity()) {
            self.metrics.record_rejected();
            return;
        }

        self.metrics.record_accepted();
        let inner = Arc::clone(self);
        let event = Arc::clone(event);
        self.scheduler
            .schedule(Box::new(move || inner.deliver(&event)));
    }

    /// Deferred half: sink, then observer, with failures isolated.
    fn deliver(&self, event: &LogEvent) {
        if self.is_disposed() {
            self.metrics.record_discarded();
            return;
        }

        let observer = self.observer.read().clone();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> Result<()> {
            self.sink.write(event)?;
            if let Some(observer) = &observer {
                observer(&self.renderer.render_plain(event), event);
            }
            Ok(())
        }));

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };

        match failure {
            None => {
                self.metrics.record_delivered();
            }
            Some(message) => {
                self.metrics.record_failed();
                self.report_failure(message);
            }
        }
    }

    fn report_failure(&self, message: String) {
        let line = format!("{}\n", LoggerError::handler_processing(message));
        if let Err(e) = self.diagnostics.write(Destination::Stderr, &line) {
            eprintln!("[LOGGER ERROR] Failed to report handler failure: {}", e);
        }
    }
}

/// A filtering policy plus a sink, with an explicit lifecycle.
///
/// Cloning a `LogHandler` yields another reference to the same handler, so
/// one handler can be attached to several loggers. Equality is identity.
#[derive(Clone)]
pub struct LogHandler {
    inner: Arc<HandlerInner>,
}

impl LogHandler {
    pub fn new(config: HandlerConfig) -> Result<Self> {
        config.build()
    }

    pub fn builder() -> HandlerConfig {
        HandlerConfig::new()
    }

    /// The single filtering predicate. Always `false` once disposed.
    pub fn should_report(&self, severity: Severity) -> bool {
        self.inner.should_report(severity)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.inner.lifecycle.read()
    }

    /// Current threshold; `Off` once disposed.
    pub fn threshold(&self) -> Severity {
        match self.lifecycle() {
            Lifecycle::Active(policy) => policy.threshold,
            Lifecycle::Disposed => Severity::Off,
        }
    }

    pub fn allows_audit(&self) -> bool {
        matches!(self.lifecycle(), Lifecycle::Active(policy) if policy.allow_audit)
    }

    pub fn allows_metric(&self) -> bool {
        matches!(self.lifecycle(), Lifecycle::Active(policy) if policy.allow_metric)
    }

    /// Symbolic name of the threshold. A disposed handler's threshold is
    /// `Off`, which has no name.
    pub fn level_descriptor(&self) -> Result<&'static str> {
        severity_to_name(self.threshold())
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Unsubscribe and stop accepting events. Safe to call repeatedly.
    ///
    /// Deliveries already scheduled but not yet run are discarded.
    pub fn dispose(&self) {
        if let Some(id) = self.inner.subscription.lock().take() {
            self.inner.bus.unsubscribe(id);
        }
        *self.inner.lifecycle.write() = Lifecycle::Disposed;
    }

    /// Attach or replace the observer. Deliveries that have not run yet see
    /// the new one.
    pub fn set_on_message<F>(&self, observer: F)
    where
        F: Fn(&str, &LogEvent) + Send + Sync + 'static,
    {
        *self.inner.observer.write() = Some(Arc::new(observer));
    }

    pub fn clear_on_message(&self) {
        *self.inner.observer.write() = None;
    }

    /// Wait up to `timeout` for this handler's scheduled deliveries.
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        self.inner.scheduler.drain(timeout)
    }

    /// Publish an event on this handler's log channel.
    ///
    /// Returns `false` when nothing is subscribed, i.e. after disposal.
    pub fn publish(&self, event: &Arc<LogEvent>) -> bool {
        self.inner.bus.publish(LOG_CHANNEL, event) > 0
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.inner.metrics
    }

    pub fn sink_name(&self) -> &str {
        self.inner.sink.name()
    }

    pub fn ptr_eq(&self, other: &LogHandler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for LogHandler {
    fn default() -> Self {
        HandlerConfig::new().build_with_threshold(Severity::Info)
    }
}

impl PartialEq for LogHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for LogHandler {}

impl fmt::Debug for LogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandler")
            .field("lifecycle", &self.lifecycle())
            .field("sink", &self.sink_name())
            .field("observer", &self.inner.observer.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::TaskQueue;
    use crate::core::host::Host;
    use crate::core::log_record::{LogMessage, LogRecord, MessageOptions};
    use crate::sinks::MemoryWriter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(severity: Severity) -> Arc<LogEvent> {
        Arc::new(LogEvent::new(LogRecord::new(
            severity,
            LogMessage::from("message"),
            None,
            MessageOptions::new(),
        )))
    }

    fn counting_handler(config: HandlerConfig) -> (LogHandler, Arc<TaskQueue>, Arc<AtomicUsize>) {
        let queue = Arc::new(TaskQueue::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = config
            .scheduler(queue.clone())
            .sink(move |_event: &LogEvent| -> Result<()> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build()
            .unwrap();
        (handler, queue, calls)
    }

    #[test]
    fn test_defaults() {
        let (handler, _, _) = counting_handler(HandlerConfig::new());
        assert_eq!(handler.threshold(), Severity::Info);
        assert!(handler.allows_audit());
        assert!(handler.allows_metric());
        assert_eq!(handler.level_descriptor().unwrap(), "info");
        assert!(!handler.is_disposed());
        assert_eq!(handler.sink_name(), "closure");
    }

    #[test]
    fn test_default_sink_is_console() {
        let handler = HandlerConfig::new()
            .scheduler(Arc::new(TaskQueue::new()))
            .build()
            .unwrap();
        assert_eq!(handler.sink_name(), "console");
    }

    #[test]
    fn test_level_accepts_name_and_ordinal() {
        let (by_name, _, _) = counting_handler(HandlerConfig::new().level("debug"));
        assert_eq!(by_name.threshold(), Severity::Debug);

        let (by_ordinal, _, _) = counting_handler(HandlerConfig::new().level(0x1eu8));
        assert_eq!(by_ordinal.threshold(), Severity::Warning);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let result = HandlerConfig::new().level("loud").build();
        assert!(matches!(result, Err(LoggerError::UnrecognizedLevel(_))));

        let result = HandlerConfig::new().level(Severity::Off).build();
        assert!(matches!(result, Err(LoggerError::UnrecognizedLevel(_))));

        let result = HandlerConfig::new().level(2u8).build();
        assert!(matches!(result, Err(LoggerError::UnrecognizedLevel(_))));
    }

    #[test]
    fn test_threshold_comparison() {
        let (handler, _, _) = counting_handler(HandlerConfig::new().level(Severity::Warning));
        assert!(handler.should_report(Severity::Fatal));
        assert!(handler.should_report(Severity::Error));
        assert!(handler.should_report(Severity::Warning));
        assert!(!handler.should_report(Severity::Info));
        assert!(!handler.should_report(Severity::Debug));
        assert!(!handler.should_report(Severity::Trace));
        assert!(!handler.should_report(Severity::Off));
    }

    #[test]
    fn test_gates_are_independent_of_threshold() {
        let (handler, _, _) = counting_handler(
            HandlerConfig::new()
                .level(Severity::Metric)
                .allow_audit(false)
                .allow_metric(false),
        );
        assert!(handler.should_report(Severity::Trace));
        assert!(!handler.should_report(Severity::Audit));
        assert!(!handler.should_report(Severity::Metric));

        let (handler, _, _) = counting_handler(HandlerConfig::new().level(Severity::Fatal));
        assert!(handler.should_report(Severity::Audit));
        assert!(handler.should_report(Severity::Metric));
    }

    #[test]
    fn test_accepted_events_are_deferred() {
        let (handler, queue, calls) = counting_handler(HandlerConfig::new());

        assert!(handler.publish(&event(Severity::Info)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(queue.len(), 1);

        queue.run_pending();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handler.metrics().delivered(), 1);
    }

    #[test]
    fn test_rejected_events_schedule_nothing() {
        let (handler, queue, calls) = counting_handler(HandlerConfig::new().level("error"));

        handler.publish(&event(Severity::Info));
        assert!(queue.is_empty());
        queue.run_until_idle();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler.metrics().rejected(), 1);
    }

    #[test]
    fn test_dispose_is_idempotent_and_final() {
        let (handler, queue, calls) = counting_handler(HandlerConfig::new());

        handler.dispose();
        handler.dispose();

        assert!(handler.is_disposed());
        assert_eq!(handler.threshold(), Severity::Off);
        assert!(!handler.allows_audit());
        assert!(!handler.allows_metric());
        assert!(handler.level_descriptor().is_err());
        for severity in Severity::NAMED {
            assert!(!handler.should_report(severity));
        }

        assert!(!handler.publish(&event(Severity::Fatal)));
        queue.run_until_idle();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispose_discards_scheduled_deliveries() {
        let (handler, queue, calls) = counting_handler(HandlerConfig::new());

        handler.publish(&event(Severity::Error));
        assert_eq!(queue.len(), 1);
        handler.dispose();
        queue.run_pending();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler.metrics().discarded(), 1);
    }

    #[test]
    fn test_observer_receives_plain_text() {
        let queue = Arc::new(TaskQueue::new());
        let writer = Arc::new(MemoryWriter::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let handler = HandlerConfig::new()
            .scheduler(queue.clone())
            .renderer(Renderer::new(Host::Server))
            .shared_sink(Arc::new(ConsoleSink::with_writer(
                Renderer::new(Host::Server),
                writer.clone(),
            )))
            .on_message(move |text: &str, event: &LogEvent| {
                sink_seen.lock().push((text.to_string(), event.severity()));
            })
            .build()
            .unwrap();

        handler.publish(&event(Severity::Warning));
        queue.run_pending();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("[warning]"));
        assert!(!seen[0].0.contains('\x1b'));
        assert_eq!(seen[0].1, Severity::Warning);
        assert_eq!(writer.written_to(Destination::Warn).len(), 1);
    }

    #[test]
    fn test_sink_error_is_reported_not_propagated() {
        let queue = Arc::new(TaskQueue::new());
        let diagnostics = Arc::new(MemoryWriter::new());
        let observed = Arc::new(AtomicUsize::new(0));
        let observer_count = Arc::clone(&observed);

        let handler = HandlerConfig::new()
            .scheduler(queue.clone())
            .diagnostics(diagnostics.clone())
            .sink(|_event: &LogEvent| -> Result<()> { Err(LoggerError::sink("disk full")) })
            .on_message(move |_text: &str, _event: &LogEvent| {
                observer_count.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        handler.publish(&event(Severity::Error));
        queue.run_pending();

        assert_eq!(
            diagnostics.written_to(Destination::Stderr),
            vec!["Error in log handler: Sink error: disk full\n".to_string()]
        );
        assert_eq!(observed.load(Ordering::SeqCst), 0);
        assert_eq!(handler.metrics().failed(), 1);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let queue = Arc::new(TaskQueue::new());
        let diagnostics = Arc::new(MemoryWriter::new());

        let handler = HandlerConfig::new()
            .scheduler(queue.clone())
            .diagnostics(diagnostics.clone())
            .sink(|_event: &LogEvent| -> Result<()> { Ok(()) })
            .on_message(|_text: &str, _event: &LogEvent| panic!("observer broke"))
            .build()
            .unwrap();

        handler.publish(&event(Severity::Info));
        handler.publish(&event(Severity::Info));
        assert_eq!(queue.run_pending(), 2);

        let reports = diagnostics.written_to(Destination::Stderr);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], "Error in log handler: observer broke\n");
        assert_eq!(handler.metrics().failed(), 2);
    }

    #[test]
    fn test_observer_attached_after_build() {
        let (handler, queue, _) = counting_handler(HandlerConfig::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let observer_seen = Arc::clone(&seen);

        handler.publish(&event(Severity::Info));
        handler.set_on_message(move |text: &str, _event: &LogEvent| {
            observer_seen.lock().push(text.to_string());
        });
        handler.publish(&event(Severity::Error));
        queue.run_pending();
        assert_eq!(seen.lock().len(), 2);
        assert!(seen.lock()[1].contains("[error]"));

        handler.clear_on_message();
        handler.publish(&event(Severity::Info));
        queue.run_pending();
        assert_eq!(seen.lock().len(), 2);
        assert_eq!(handler.metrics().delivered(), 3);
    }

    #[test]
    fn test_identity_equality() {
        let queue: Arc<dyn Scheduler> = Arc::new(TaskQueue::new());
        let a = HandlerConfig::new().scheduler(queue.clone()).build().unwrap();
        let b = HandlerConfig::new().scheduler(queue).build().unwrap();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
