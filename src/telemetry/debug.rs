//! Debug entry options.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Diagnostic category selected for a debug entry.
///
/// Parsing never fails: unrecognized tags become [`DebugLevel::Invalid`],
/// which is reported by the logger and selects no diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DebugLevel {
    /// Base message only
    #[default]
    Info,
    /// Stack trace
    Stack,
    /// Memory statistics
    Mem,
    /// Collection statistics
    Gc,
    /// Build metadata
    Build,
    /// Every category
    All,
    /// Unrecognized tag
    Invalid(String),
}

impl DebugLevel {
    /// The tag this level parses from.
    pub fn as_str(&self) -> &str {
        match self {
            DebugLevel::Info => "INFO",
            DebugLevel::Stack => "STACK",
            DebugLevel::Mem => "MEM",
            DebugLevel::Gc => "GC",
            DebugLevel::Build => "BUILD",
            DebugLevel::All => "ALL",
            DebugLevel::Invalid(tag) => tag,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, DebugLevel::Invalid(_))
    }

    pub fn includes_stack(&self) -> bool {
        matches!(self, DebugLevel::Stack | DebugLevel::All)
    }

    pub fn includes_mem(&self) -> bool {
        matches!(self, DebugLevel::Mem | DebugLevel::All)
    }

    pub fn includes_gc(&self) -> bool {
        matches!(self, DebugLevel::Gc | DebugLevel::All)
    }

    pub fn includes_build(&self) -> bool {
        matches!(self, DebugLevel::Build | DebugLevel::All)
    }
}

impl From<&str> for DebugLevel {
    fn from(tag: &str) -> Self {
        match tag {
            "INFO" => DebugLevel::Info,
            "STACK" => DebugLevel::Stack,
            "MEM" => DebugLevel::Mem,
            "GC" => DebugLevel::Gc,
            "BUILD" => DebugLevel::Build,
            "ALL" => DebugLevel::All,
            other => DebugLevel::Invalid(other.to_string()),
        }
    }
}

impl From<String> for DebugLevel {
    fn from(tag: String) -> Self {
        DebugLevel::from(tag.as_str())
    }
}

impl From<DebugLevel> for String {
    fn from(level: DebugLevel) -> Self {
        match level {
            DebugLevel::Invalid(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for DebugLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DebugLevel::from(s))
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options for [`Logger::debug`](crate::Logger::debug).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Collect diagnostics at all
    pub enabled: bool,
    /// Which diagnostics to emit
    pub level: DebugLevel,
}

impl DebugOptions {
    /// Diagnostics enabled for `level`.
    pub fn enabled(level: impl Into<DebugLevel>) -> Self {
        Self {
            enabled: true,
            level: level.into(),
        }
    }

    /// Diagnostics disabled.
    pub fn disabled() -> Self {
        Self::default()
    }
}
