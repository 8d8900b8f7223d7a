//! Plain text messages
//!
//! `<time> <host> <user> <pv> new=<value> old=<value> [min=<value> max=<value>]`

use chrono::format::{Item, StrftimeItems};
use parking_lot::RwLock;

use super::{write_time, FormattedMessage, LogRecord};
use crate::config::TimestampZone;
use crate::error::FormatError;

/// Check that a strftime pattern only holds known conversions
pub fn validate_time_format(pattern: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidTimeFormat(pattern.to_string()));
    }
    Ok(())
}

pub struct PlainFormatter {
    time_format: RwLock<String>,
    line_limit: usize,
    zone: TimestampZone,
}

impl PlainFormatter {
    pub fn new(
        time_format: &str,
        line_limit: usize,
        zone: TimestampZone,
    ) -> Result<Self, FormatError> {
        validate_time_format(time_format)?;
        Ok(Self {
            time_format: RwLock::new(time_format.to_string()),
            line_limit,
            zone,
        })
    }

    pub fn set_time_format(&self, pattern: &str) -> Result<(), FormatError> {
        validate_time_format(pattern)?;
        *self.time_format.write() = pattern.to_string();
        Ok(())
    }

    pub fn time_format(&self) -> String {
        self.time_format.read().clone()
    }

    pub fn line_limit(&self) -> usize {
        self.line_limit
    }

    pub fn format(&self, record: &LogRecord<'_>) -> Result<FormattedMessage, FormatError> {
        let event = record.event;
        let mut line = String::with_capacity(self.line_limit + 32);

        {
            let pattern = self.time_format.read();
            write_time(&mut line, &event.timestamp, self.zone, &pattern)
                .map_err(|_| FormatError::InvalidTimeFormat(pattern.clone()))?;
        }

        line.push(' ');
        line.push_str(&event.host);
        line.push(' ');
        line.push_str(&event.user);
        line.push(' ');
        line.push_str(&event.name);
        line.push_str(" new=");
        line.push_str(&event.new_value.to_plain_string());
        line.push_str(" old=");
        line.push_str(&record.old_value.to_plain_string());

        if let Some(burst) = &record.burst {
            line.push_str(" min=");
            line.push_str(&burst.min.to_plain_string());
            line.push_str(" max=");
            line.push_str(&burst.max.to_plain_string());
        }

        let truncated = truncate_chars(&mut line, self.line_limit);
        Ok(FormattedMessage {
            text: line,
            truncated,
        })
    }
}

fn truncate_chars(line: &mut String, limit: usize) -> bool {
    match line.char_indices().nth(limit) {
        Some((cut, _)) => {
            line.truncate(cut);
            true
        }
        None => false,
    }
}
