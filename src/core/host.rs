//! Host environment detection
//!
//! A host is either a server/interactive process, which keeps ANSI colors and
//! splits diagnostic streams, or a browser-like embedding, which receives
//! plain text on a single console stream.

use std::sync::OnceLock;

/// Environment variable naming the process type (e.g. `renderer`).
///
/// Only consulted when no server-runtime marker is present, i.e. on
/// `wasm32-unknown-unknown`. Native builds always carry the marker and are
/// classified as [`Host::Server`] whatever this variable says.
pub const PROCESS_TYPE_ENV: &str = "LOG_PROCESS_TYPE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Host {
    #[default]
    Server,
    Browser,
}

impl Host {
    /// Classify the running process.
    pub fn detect() -> Self {
        HostProbe::from_env().classify()
    }

    /// The host detected on first use, cached for the life of the process.
    pub fn current() -> Self {
        static CURRENT: OnceLock<Host> = OnceLock::new();
        *CURRENT.get_or_init(Host::detect)
    }

    #[inline]
    pub fn is_browser(self) -> bool {
        self == Host::Browser
    }
}

/// The raw markers host classification is decided from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostProbe {
    /// Version of the server runtime, absent in browser-like embeddings.
    pub runtime_version: Option<String>,
    /// Whether a DOM-bearing window object exists.
    pub has_window: bool,
    pub process_type: Option<String>,
}

impl HostProbe {
    pub fn from_env() -> Self {
        let web = cfg!(all(target_family = "wasm", target_os = "unknown"));
        Self {
            runtime_version: if web {
                None
            } else {
                Some(env!("CARGO_PKG_VERSION").to_string())
            },
            has_window: web,
            process_type: std::env::var(PROCESS_TYPE_ENV).ok(),
        }
    }

    /// Browser-like iff no runtime marker, and either a window exists or the
    /// process type is `renderer`.
    pub fn classify(&self) -> Host {
        if self.runtime_version.is_some() {
            return Host::Server;
        }
        if self.has_window || self.process_type.as_deref() == Some("renderer") {
            Host::Browser
        } else {
            Host::Server
        }
    }
}
