//! Diagnostic log settings

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Target prefix of the put logger's own diagnostics
pub const ENGINE_TARGET: &str = "putlog_engine";

/// How the diagnostic subscriber writes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base filter level; `RUST_LOG` takes precedence when set
    pub level: String,
    pub console: ConsoleFormat,
    /// Additional JSON lines file
    pub file: Option<FileConfig>,
    pub fields: JsonFields,
    /// Per-target levels, `off` silences a target
    pub overrides: BTreeMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleFormat::Json,
            file: None,
            fields: JsonFields::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Pretty colored console, put logger internals at trace
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            console: ConsoleFormat::Pretty { ansi: true },
            ..Default::default()
        }
        .with_override(ENGINE_TARGET, "trace")
    }

    /// Daily JSON lines files under `dir`, nothing on the console
    pub fn production(dir: impl AsRef<Path>) -> Self {
        Self {
            console: ConsoleFormat::Off,
            file: Some(FileConfig::rolling(dir, FileRotation::Daily).with_keep(30)),
            fields: JsonFields {
                thread: true,
                ..JsonFields::default()
            },
            ..Default::default()
        }
    }

    /// Warnings and errors only
    pub fn testing() -> Self {
        Self {
            level: "warn".to_string(),
            fields: JsonFields {
                source_location: false,
                ..JsonFields::default()
            },
            ..Default::default()
        }
    }

    /// Set the level for one target
    pub fn with_override(mut self, target: impl Into<String>, level: impl Into<String>) -> Self {
        self.overrides.insert(target.into(), level.into());
        self
    }

    /// `EnvFilter` directives, e.g. `warn,putlog_engine::sink=debug`
    pub fn filter_directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.overrides
                    .iter()
                    .map(|(target, level)| format!("{}={}", target, level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleFormat {
    Off,
    /// One JSON object per line on stdout
    #[default]
    Json,
    /// Human-readable multi-field lines
    Pretty { ansi: bool },
}

impl ConsoleFormat {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ConsoleFormat::Off)
    }
}

/// JSON lines file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub directory: PathBuf,
    /// File name, or file name prefix when rotating
    pub prefix: String,
    pub rotation: FileRotation,
    /// Rotated files to keep, all when `None`
    pub keep: Option<usize>,
}

impl FileConfig {
    /// One `<prefix>.log` file, truncated when the subscriber is built
    pub fn single(directory: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.into(),
            rotation: FileRotation::Never,
            keep: None,
        }
    }

    /// Rotating `putlog.<date>` files
    pub fn rolling(directory: impl AsRef<Path>, rotation: FileRotation) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: "putlog".to_string(),
            rotation,
            keep: Some(7),
        }
    }

    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = Some(keep);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRotation {
    Daily,
    Hourly,
    Never,
}

/// Which optional fields JSON lines carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFields {
    /// Event fields at the top level instead of under `fields`
    pub flatten: bool,
    /// The full span stack next to the current span
    pub span_list: bool,
    pub thread: bool,
    pub source_location: bool,
}

impl Default for JsonFields {
    fn default() -> Self {
        Self {
            flatten: true,
            span_list: true,
            thread: false,
            source_location: true,
        }
    }
}
