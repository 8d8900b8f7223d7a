//! Diagnostic logging for the putlog audit logger
//!
//! The audit messages themselves go to log servers; this crate sets up the
//! `tracing` subscriber that receives the logger's own diagnostics (dropped
//! events, failing endpoints, truncated lines).
//!
//! # Features
//!
//! - **JSON lines** on the console by default, pretty output for development
//! - **Worker context**: diagnostics from a consumer thread carry the logger
//!   name and instance id
//! - **File output**: a single file or daily/hourly rotation via tracing-appender
//!
//! # Quick Start
//!
//! ```ignore
//! use putlog_logging::{LogConfig, PutLogSubscriberBuilder};
//!
//! let _guard = PutLogSubscriberBuilder::new().init();
//!
//! let _guard = PutLogSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod layers;

pub use config::{ConsoleFormat, FileConfig, FileRotation, JsonFields, LogConfig, ENGINE_TARGET};
pub use context::{WorkerContextData, WorkerContextGuard};
pub use error::LoggingError;
pub use layers::{WorkerContextExtension, WorkerContextLayer};

use std::fs::{self, File};

use tracing::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::{EnvFilter, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builds the diagnostic subscriber from a [`LogConfig`]
#[derive(Debug, Clone, Default)]
pub struct PutLogSubscriberBuilder {
    config: LogConfig,
}

impl PutLogSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the base filter level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn with_console(mut self, console: ConsoleFormat) -> Self {
        self.config.console = console;
        self
    }

    /// Also write JSON lines to a file
    pub fn with_file_output(mut self, file: FileConfig) -> Self {
        self.config.file = Some(file);
        self
    }

    /// Build the subscriber without installing it.
    ///
    /// With file output the returned guard flushes the file when dropped and
    /// has to outlive every use of the dispatcher.
    pub fn build(self) -> Result<(Dispatch, Option<WorkerGuard>), LoggingError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.config.filter_directives())?,
        };

        let mut outputs: Vec<BoxedLayer> = Vec::with_capacity(2);
        match self.config.console {
            ConsoleFormat::Off => {}
            ConsoleFormat::Json => outputs.push(self.json_output(std::io::stdout)),
            ConsoleFormat::Pretty { ansi } => outputs.push(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(ansi)
                    .with_thread_names(true)
                    .boxed(),
            ),
        }

        let guard = match &self.config.file {
            Some(file) => {
                let (writer, guard) = file_writer(file)?;
                outputs.push(self.json_output(writer));
                Some(guard)
            }
            None => None,
        };

        let subscriber = Registry::default()
            .with(outputs)
            .with(filter)
            .with(WorkerContextLayer::new());
        Ok((Dispatch::new(subscriber), guard))
    }

    /// Install the subscriber as the global default
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let (dispatch, guard) = self.build()?;
        tracing::dispatcher::set_global_default(dispatch)
            .map_err(|_| LoggingError::AlreadyInitialized)?;
        Ok(guard)
    }

    /// Like [`Self::try_init`], printing the failure to stderr instead
    pub fn init(self) -> Option<WorkerGuard> {
        self.try_init().unwrap_or_else(|e| {
            eprintln!("putlog: diagnostic logging not installed: {}", e);
            None
        })
    }

    fn json_output<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let fields = self.config.fields;
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(fields.flatten)
            .with_current_span(true)
            .with_span_list(fields.span_list)
            .with_thread_ids(fields.thread)
            .with_thread_names(fields.thread)
            .with_file(fields.source_location)
            .with_line_number(fields.source_location)
            .with_writer(writer)
            .boxed()
    }
}

/// Open the non-blocking file writer
fn file_writer(file: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file.directory)?;

    let rotation = match file.rotation {
        FileRotation::Daily => Rotation::DAILY,
        FileRotation::Hourly => Rotation::HOURLY,
        FileRotation::Never => {
            let single = File::create(file.directory.join(format!("{}.log", file.prefix)))?;
            return Ok(tracing_appender::non_blocking(single));
        }
    };

    let mut appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file.prefix);
    if let Some(keep) = file.keep {
        appender = appender.max_log_files(keep);
    }
    Ok(tracing_appender::non_blocking(appender.build(&file.directory)?))
}

/// JSON lines on stdout at `info`
pub fn init_default() {
    let _ = PutLogSubscriberBuilder::new().init();
}

/// Pretty console output at `debug`
pub fn init_development() {
    let _ = PutLogSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Warnings only, ignoring an already installed subscriber
pub fn init_testing() {
    let _ = PutLogSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let builder = PutLogSubscriberBuilder::new()
            .with_config(LogConfig::development())
            .with_level("trace")
            .with_console(ConsoleFormat::Off);
        assert_eq!(builder.config.level, "trace");
        assert_eq!(builder.config.console, ConsoleFormat::Off);
        assert!(builder.config.overrides.contains_key(ENGINE_TARGET));
    }

    #[test]
    fn test_build_without_outputs() {
        let (_dispatch, guard) = PutLogSubscriberBuilder::new()
            .with_console(ConsoleFormat::Off)
            .build()
            .unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_bad_directive_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let result = PutLogSubscriberBuilder::new()
            .with_level("putlog_engine=loudest")
            .with_console(ConsoleFormat::Off)
            .build();
        assert!(matches!(result, Err(LoggingError::Filter(_))));
    }
}
