//! Human-readable rendering of log events

use super::host::Host;
use super::log_event::LogEvent;
use super::severity::severity_to_name;
use super::timestamp::TimestampFormat;
use colored::Color;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

const RESET: &str = "\x1b[0m";

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x1b\[\d+m").expect("ANSI pattern is a valid regex"))
}

/// Remove `ESC [ <digits> m` color sequences.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ansi_pattern().replace_all(text, "")
}

fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}{}", color.to_fg_str(), text, RESET)
}

/// Turns events into single, optionally multi-line, colored text blocks.
///
/// Layout: `<timestamp> [<level>] (<process>) <type> from "<id>" >> <body>`.
/// The process annotation reads `(at <namespace> - <pid>)` on a server host
/// and `(at <namespace>)` on a browser-like host, where it disappears when
/// the record has no namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renderer {
    host: Host,
    timestamp_format: TimestampFormat,
}

impl Renderer {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn for_current_host() -> Self {
        Self::new(Host::current())
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn host(&self) -> Host {
        self.host
    }

    pub fn render(&self, event: &LogEvent) -> String {
        let record = event.record();
        let severity = record.severity();
        let mut parts = Vec::with_capacity(5);

        parts.push(paint(
            &self.timestamp_format.format(record.timestamp()),
            Color::Green,
        ));

        let name = severity_to_name(severity).unwrap_or("off");
        parts.push(paint(&format!("[{}]", name), severity.color_code()));

        if let Some(process) = self.process_annotation(record.namespace()) {
            parts.push(paint(&process, Color::Magenta));
        }

        if let Some(kind) = record.kind() {
            let origin = match record.id() {
                Some(id) => format!("{} from \"{}\" >>", kind, id),
                None => format!("{} >>", kind),
            };
            parts.push(paint(&origin, Color::Blue));
        }

        parts.push(record.message().body().into_owned());
        parts.join(" ")
    }

    /// Rendering with every color sequence removed.
    pub fn render_plain(&self, event: &LogEvent) -> String {
        strip_ansi(&self.render(event)).into_owned()
    }

    fn process_annotation(&self, namespace: Option<&str>) -> Option<String> {
        match (self.host, namespace) {
            (Host::Browser, Some(ns)) => Some(format!("(at {})", ns)),
            (Host::Browser, None) => None,
            (Host::Server, Some(ns)) => Some(format!("(at {} - {})", ns, std::process::id())),
            (Host::Server, None) => Some(format!("({})", std::process::id())),
        }
    }
}
