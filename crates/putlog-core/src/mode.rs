//! Logging modes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Suppression and filtering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// Nothing is logged, the trap rejects every put
    Disabled,
    /// Puts that do not change the value are suppressed
    LogOnChange,
    /// Every put is logged, rapid puts to one field are merged
    #[default]
    LogAll,
    /// Every put is logged as its own message
    LogAllNoFilter,
}

impl LogMode {
    /// Administrative integer code
    pub fn code(&self) -> i32 {
        match self {
            LogMode::Disabled => -1,
            LogMode::LogOnChange => 0,
            LogMode::LogAll => 1,
            LogMode::LogAllNoFilter => 2,
        }
    }

    /// Map an administrative code, falling back to [`LogMode::LogAll`] with a
    /// warning for unknown codes
    pub fn from_code(code: i32) -> Self {
        match Self::try_from(code) {
            Ok(mode) => mode,
            Err(e) => {
                warn!(code, error = %e, "falling back to log-all mode");
                LogMode::LogAll
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, LogMode::Disabled)
    }

    /// Whether puts that leave the value unchanged are dropped
    pub fn suppresses_unchanged(&self) -> bool {
        matches!(self, LogMode::LogOnChange)
    }

    /// Whether consecutive puts to one field may be merged
    pub fn merges_bursts(&self) -> bool {
        !matches!(self, LogMode::LogAllNoFilter)
    }

    fn name(&self) -> &'static str {
        match self {
            LogMode::Disabled => "disabled",
            LogMode::LogOnChange => "log_on_change",
            LogMode::LogAll => "log_all",
            LogMode::LogAllNoFilter => "log_all_no_filter",
        }
    }
}

impl TryFrom<i32> for LogMode {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(LogMode::Disabled),
            0 => Ok(LogMode::LogOnChange),
            1 => Ok(LogMode::LogAll),
            2 => Ok(LogMode::LogAllNoFilter),
            other => Err(ConfigError::InvalidModeCode(other)),
        }
    }
}

impl FromStr for LogMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "disabled" => Ok(LogMode::Disabled),
            "log_on_change" | "on_change" => Ok(LogMode::LogOnChange),
            "log_all" | "all" => Ok(LogMode::LogAll),
            "log_all_no_filter" | "no_filter" => Ok(LogMode::LogAllNoFilter),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
