//! Build metadata captured at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

const RUSTC: &str = env!("TRADELOG_BUILD_RUSTC");
const TARGET: &str = env!("TRADELOG_BUILD_TARGET");
const PROFILE: &str = env!("TRADELOG_BUILD_PROFILE");
const COMMIT: &str = env!("TRADELOG_BUILD_COMMIT");

/// Build metadata for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub package: String,
    pub version: String,
    pub rustc: String,
    pub target: String,
    pub profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl BuildInfo {
    /// Build info for an arbitrary package compiled with the same
    /// toolchain as this crate. Used by [`build_info!`](crate::build_info).
    pub fn for_package(package: &str, version: &str) -> Self {
        Self {
            package: package.to_string(),
            version: version.to_string(),
            rustc: RUSTC.to_string(),
            target: TARGET.to_string(),
            profile: PROFILE.to_string(),
            commit: None,
        }
    }

    /// Build info of this crate, including the commit it was built from
    /// when known.
    pub fn compiled() -> Self {
        let info = Self::for_package(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        if COMMIT.is_empty() {
            info
        } else {
            info.with_commit(COMMIT)
        }
    }

    /// Attach a commit id.
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package\t{}", self.package)?;
        writeln!(f, "version\t{}", self.version)?;
        writeln!(f, "rustc\t{}", self.rustc)?;
        writeln!(f, "target\t{}", self.target)?;
        write!(f, "profile\t{}", self.profile)?;
        if let Some(commit) = &self.commit {
            write!(f, "\ncommit\t{commit}")?;
        }
        Ok(())
    }
}

/// Capture [`BuildInfo`] for the package that invokes the macro.
///
/// ```rust
/// let info = tradelog::build_info!();
/// assert!(!info.package.is_empty());
/// ```
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::runtime::BuildInfo::for_package(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    };
}
