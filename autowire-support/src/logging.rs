//! Logging setup for applications embedding the container.
//!
//! The container itself only emits `tracing` events; this module installs a
//! `tracing-subscriber` formatter so those events become visible.
//!
//! ```rust,ignore
//! use autowire_support::logging;
//!
//! // RUST_LOG wins when set, otherwise `autowire=debug`.
//! logging::init();
//!
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .container_only()
//!     .compact()
//!     .init();
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Target prefix shared by the container crates.
pub const CONTAINER_TARGET: &str = "autowire";

/// Output format for [`LoggingBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line human readable output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
}

/// Builder for the global subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    respect_env: bool,
    with_thread_ids: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Compact,
            target: None,
            respect_env: true,
            with_thread_ids: false,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum level for the default filter.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Restrict the default filter to a single target.
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show events emitted by the container crates.
    pub fn container_only(self) -> Self {
        self.with_target_filter(CONTAINER_TARGET)
    }

    /// Ignore `RUST_LOG` and always use the configured filter.
    pub fn ignore_env(mut self) -> Self {
        self.respect_env = false;
        self
    }

    pub fn with_thread_ids(mut self) -> Self {
        self.with_thread_ids = true;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    pub fn compact(mut self) -> Self {
        self.format = LogFormat::Compact;
        self
    }

    /// The filter directive this builder falls back to without `RUST_LOG`.
    pub fn directive(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        match self.target {
            Some(target) => format!("{target}={level}"),
            None => level,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.respect_env {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
        } else {
            EnvFilter::new(self.directive())
        }
    }

    /// Install the subscriber.
    ///
    /// Returns `false` when a global subscriber was already installed.
    pub fn init(self) -> bool {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_thread_ids(self.with_thread_ids)
            .with_target(true);

        let installed = match self.format {
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        };

        installed.is_ok()
    }
}

pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install a compact subscriber showing container events at `DEBUG`.
pub fn init() -> bool {
    builder().container_only().init()
}
