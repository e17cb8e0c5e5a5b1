//! Program configuration, normally read from an optional `burrow.toml` file.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::somehow::{Context, Result};

/// Top-level program configuration.
///
/// Every field has a default, so a missing config file is equivalent to
/// `Config::default()`: the tool should work out of the box on a freshly
/// cloned checkout without requiring the user to write a config file first.
/// A config file that exists but fails to parse is still a hard error.
#[derive(Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub bubblewrap: Bubblewrap,
}

/// Configuration specific to the Bubblewrap sandbox runner.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct Bubblewrap {
    /// Path to a seccomp BPF filter program to load into the sandbox, or
    /// `"disabled"` to run without one. `None` means "use the filter shipped
    /// alongside this program", resolved relative to the running
    /// executable's location once the install directory is known.
    pub seccomp: Option<PathOrDisabled>,

    /// How long a built package is considered fresh before the Freshness
    /// Oracle rebuilds it unconditionally, even with unchanged source.
    #[serde(default = "default_auto_update", with = "duration_secs")]
    pub auto_update: Duration,
}

impl Default for Bubblewrap {
    fn default() -> Self {
        Self {
            seccomp: None,
            auto_update: default_auto_update(),
        }
    }
}

fn default_auto_update() -> Duration {
    Duration::from_secs(12 * 60 * 60)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Either a path to a seccomp filter, or an explicit opt-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOrDisabled {
    Path(PathBuf),
    DangerouslyDisabled,
}

impl<'de> Deserialize<'de> for PathOrDisabled {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "disabled" {
            PathOrDisabled::DangerouslyDisabled
        } else {
            PathOrDisabled::Path(PathBuf::from(s))
        })
    }
}

impl Config {
    /// Parses and validates a TOML-formatted string into a Config.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid config")
    }

    /// Reads and parses a TOML config file. A missing file yields
    /// `Config::default()`; any other read or parse error is fatal.
    pub fn read_from_file(path: &std::path::Path) -> Result<Self> {
        let buf = match std::fs::read_to_string(path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config file: {path:?}"))
            }
        };
        Self::from_str(&buf)
            .with_context(|| format!("failed to parse/validate config file: {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_str_empty_is_default() {
        assert_eq!(Config::default(), Config::from_str("").unwrap());
    }

    #[test]
    fn config_from_str_unknown_field() {
        let err = Config::from_str("asdf = 'what?'").unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn config_from_str_full() {
        let config = Config::from_str(
            "
            [bubblewrap]
            seccomp = 'disabled'
            auto_update = 3600
            ",
        )
        .unwrap();
        assert_eq!(
            Some(PathOrDisabled::DangerouslyDisabled),
            config.bubblewrap.seccomp
        );
        assert_eq!(Duration::from_secs(3600), config.bubblewrap.auto_update);
    }

    #[test]
    fn config_from_str_seccomp_path() {
        let config = Config::from_str(
            "
            [bubblewrap]
            seccomp = '/etc/burrow/seccomp.bpf'
            ",
        )
        .unwrap();
        assert_eq!(
            Some(PathOrDisabled::Path(PathBuf::from(
                "/etc/burrow/seccomp.bpf"
            ))),
            config.bubblewrap.seccomp
        );
    }

    #[test]
    fn read_from_file_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        assert_eq!(Config::default(), Config::read_from_file(&path).unwrap());
    }
}
