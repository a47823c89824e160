//! Console sink implementation

use super::stream::{ConsoleWriter, Destination, StreamWriter};
use crate::core::{strip_ansi, Host, LogEvent, LogSink, Renderer, Result};
use std::sync::Arc;

/// Write a rendered event to the destination its severity routes to.
///
/// Color sequences are stripped on a browser-like host. The written text
/// always ends with exactly one newline.
pub fn route_and_write(
    event: &LogEvent,
    rendered: &str,
    host: Host,
    writer: &dyn StreamWriter,
) -> Result<()> {
    let destination = Destination::route(event.severity(), host);
    let text = if host.is_browser() {
        strip_ansi(rendered)
    } else {
        rendered.into()
    };

    let mut line = text.trim_end_matches('\n').to_string();
    line.push('\n');
    writer.write(destination, &line)
}

/// The default sink: render, route, write.
pub struct ConsoleSink {
    renderer: Renderer,
    writer: Arc<dyn StreamWriter>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(Renderer::for_current_host(), Arc::new(ConsoleWriter))
    }

    pub fn with_renderer(renderer: Renderer) -> Self {
        Self::with_writer(renderer, Arc::new(ConsoleWriter))
    }

    pub fn with_writer(renderer: Renderer, writer: Arc<dyn StreamWriter>) -> Self {
        Self { renderer, writer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn write(&self, event: &LogEvent) -> Result<()> {
        let rendered = self.renderer.render(event);
        route_and_write(event, &rendered, self.renderer.host(), self.writer.as_ref())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogMessage, LogRecord, MessageOptions, Severity};
    use crate::sinks::MemoryWriter;

    fn event(severity: Severity, message: &str) -> LogEvent {
        LogEvent::new(LogRecord::new(
            severity,
            LogMessage::from(message),
            None,
            MessageOptions::new(),
        ))
    }

    #[test]
    fn test_exactly_one_trailing_newline() {
        let writer = MemoryWriter::new();
        let event = event(Severity::Info, "x");

        route_and_write(&event, "line", Host::Server, &writer).unwrap();
        route_and_write(&event, "line\n", Host::Server, &writer).unwrap();
        route_and_write(&event, "line\n\n\n", Host::Server, &writer).unwrap();

        for (_, text) in writer.entries() {
            assert_eq!(text, "line\n");
        }
    }

    #[test]
    fn test_browser_host_strips_colors() {
        let writer = MemoryWriter::new();
        let event = event(Severity::Warning, "x");

        route_and_write(&event, "\x1b[93m[warning]\x1b[0m x", Host::Browser, &writer).unwrap();
        route_and_write(&event, "\x1b[93m[warning]\x1b[0m x", Host::Server, &writer).unwrap();

        let entries = writer.entries();
        assert_eq!(entries[0], (Destination::Stdout, "[warning] x\n".to_string()));
        assert_eq!(
            entries[1],
            (Destination::Warn, "\x1b[93m[warning]\x1b[0m x\n".to_string())
        );
    }

    #[test]
    fn test_console_sink_renders_and_routes() {
        let writer = Arc::new(MemoryWriter::new());
        let sink = ConsoleSink::with_writer(Renderer::new(Host::Server), writer.clone());

        sink.write(&event(Severity::Fatal, "going down")).unwrap();
        sink.write(&event(Severity::Metric, "latency=12")).unwrap();

        let errors = writer.written_to(Destination::Stderr);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\x1b[31m[fatal]"));
        assert!(errors[0].ends_with("going down\n"));

        let out = writer.written_to(Destination::Stdout);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("latency=12"));
        assert_eq!(sink.name(), "console");
    }
}
