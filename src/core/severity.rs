//! Severity definitions
//!
//! Severities form an ordered scale where a smaller ordinal is more severe.
//! A handler threshold admits every severity whose ordinal is less than or
//! equal to its own. `Audit` and `Metric` carry the largest ordinals but are
//! a side channel: handlers admit them through dedicated gates, never through
//! the threshold comparison.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// Threshold sentinel that blocks everything. Never a record severity.
    Off = 0x01,
    Fatal = 0x0a,
    Error = 0x14,
    Warning = 0x1e,
    Info = 0x28,
    Debug = 0x32,
    Trace = 0x3c,
    Audit = 0x62,
    Metric = 0x63,
}

impl Severity {
    /// The eight named levels, most severe first.
    pub const NAMED: [Severity; 8] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
        Severity::Audit,
        Severity::Metric,
    ];

    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Resolve the ordinal of one of the eight named levels.
    pub fn from_ordinal(ordinal: u8) -> Result<Self> {
        Self::NAMED
            .iter()
            .copied()
            .find(|severity| severity.ordinal() == ordinal)
            .ok_or_else(|| LoggerError::unrecognized_level(ordinal))
    }

    /// Audit and Metric bypass threshold comparison.
    #[inline]
    pub const fn is_side_channel(self) -> bool {
        matches!(self, Severity::Audit | Severity::Metric)
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Audit | Severity::Metric => Cyan,
            Severity::Fatal | Severity::Error => Red,
            Severity::Warning => BrightYellow,
            Severity::Trace => Magenta,
            Severity::Debug => Green,
            Severity::Info | Severity::Off => BrightBlue,
        }
    }
}

/// Convert a symbolic level name into its severity.
///
/// Only the eight named levels are accepted; `off` is a threshold state and
/// has no name.
///
/// ```
/// use rust_fanout_logger::{name_to_severity, Severity};
///
/// assert_eq!(name_to_severity("warning").unwrap(), Severity::Warning);
/// assert!(name_to_severity("verbose").is_err());
/// ```
pub fn name_to_severity(name: &str) -> Result<Severity> {
    match name.to_ascii_lowercase().as_str() {
        "fatal" => Ok(Severity::Fatal),
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        "debug" => Ok(Severity::Debug),
        "trace" => Ok(Severity::Trace),
        "audit" => Ok(Severity::Audit),
        "metric" => Ok(Severity::Metric),
        _ => Err(LoggerError::unrecognized_level(name)),
    }
}

/// Convert a severity into its symbolic name. Fails for `Off`.
pub fn severity_to_name(severity: Severity) -> Result<&'static str> {
    match severity {
        Severity::Fatal => Ok("fatal"),
        Severity::Error => Ok("error"),
        Severity::Warning => Ok("warning"),
        Severity::Info => Ok("info"),
        Severity::Debug => Ok("debug"),
        Severity::Trace => Ok("trace"),
        Severity::Audit => Ok("audit"),
        Severity::Metric => Ok("metric"),
        Severity::Off => Err(LoggerError::unrecognized_level(severity.ordinal())),
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match severity_to_name(*self) {
            Ok(name) => f.write_str(name),
            Err(_) => f.write_str("off"),
        }
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        name_to_severity(s)
    }
}

impl TryFrom<u8> for Severity {
    type Error = LoggerError;

    fn try_from(ordinal: u8) -> Result<Self> {
        Severity::from_ordinal(ordinal)
    }
}

/// A level as supplied by configuration: a name, an ordinal or a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSpec {
    Name(String),
    Ordinal(u8),
    Severity(Severity),
}

impl LevelSpec {
    /// Resolve to one of the eight named levels.
    pub fn resolve(&self) -> Result<Severity> {
        match self {
            LevelSpec::Name(name) => name_to_severity(name),
            LevelSpec::Ordinal(ordinal) => Severity::from_ordinal(*ordinal),
            LevelSpec::Severity(severity) => {
                severity_to_name(*severity)?;
                Ok(*severity)
            }
        }
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<u8> for LevelSpec {
    fn from(ordinal: u8) -> Self {
        LevelSpec::Ordinal(ordinal)
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        LevelSpec::Severity(severity)
    }
}
