//! Standard stream destinations and writers

use crate::core::{Host, LoggerError, Result, Severity};
use parking_lot::Mutex;
use std::io::Write;

/// Logical console channel a rendered line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Stdout,
    Stderr,
    Warn,
    Trace,
    Debug,
}

impl Destination {
    /// Pick the destination for a severity.
    ///
    /// Warning, trace and debug only get their own channels on a server
    /// host; a browser-like host sends them to stdout.
    pub fn route(severity: Severity, host: Host) -> Self {
        match severity {
            Severity::Audit | Severity::Metric => Destination::Stdout,
            Severity::Fatal | Severity::Error => Destination::Stderr,
            Severity::Warning if host == Host::Server => Destination::Warn,
            Severity::Trace if host == Host::Server => Destination::Trace,
            Severity::Debug if host == Host::Server => Destination::Debug,
            _ => Destination::Stdout,
        }
    }

    /// Whether the destination is backed by the process's stderr.
    pub fn is_error_stream(self) -> bool {
        matches!(
            self,
            Destination::Stderr | Destination::Warn | Destination::Trace
        )
    }
}

/// Raw writes to the standard streams.
pub trait StreamWriter: Send + Sync {
    fn write(&self, destination: Destination, text: &str) -> Result<()>;
}

/// Writes to the process's stdout and stderr.
///
/// Warn and trace share stderr, debug shares stdout, following the usual
/// console conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter;

impl StreamWriter for ConsoleWriter {
    fn write(&self, destination: Destination, text: &str) -> Result<()> {
        let outcome = if destination.is_error_stream() {
            let mut stderr = std::io::stderr().lock();
            stderr.write_all(text.as_bytes()).and_then(|_| stderr.flush())
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush())
        };
        outcome.map_err(|e| {
            LoggerError::io_operation(
                format!("writing to {:?}", destination),
                "console stream unavailable",
                e,
            )
        })
    }
}

/// Captures writes in memory, in write order.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    entries: Mutex<Vec<(Destination, String)>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Destination, String)> {
        self.entries.lock().clone()
    }

    /// Texts written to one destination.
    pub fn written_to(&self, destination: Destination) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(dest, _)| *dest == destination)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn take(&self) -> Vec<(Destination, String)> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl StreamWriter for MemoryWriter {
    fn write(&self, destination: Destination, text: &str) -> Result<()> {
        self.entries.lock().push((destination, text.to_string()));
        Ok(())
    }
}
