//! Logger options
//!
//! Every field is optional. [`Log::set_options`](super::logger::Log::set_options)
//! merges only the fields that are set, so options can be layered across
//! multiple calls without clobbering earlier configuration.

use std::fmt;
use std::sync::Arc;

use crate::adapters::LogAdapter;

use super::log_level::LogLevel;

#[derive(Clone, Default)]
pub struct LogOptions {
    /// The log level
    pub level: Option<LogLevel>,
    /// Whether to log using colors. Default true
    pub use_colors: Option<bool>,
    /// Whether to log as JSON. Default false
    pub as_json: Option<bool>,
    /// Whether to show caller locations for all logs instead of just debug
    /// and trace. Enabling this incurs a slight performance penalty.
    pub show_line_numbers_for_all: Option<bool>,
    /// The namespace logs are scoped under. Setting it derives the level
    /// from the `DEBUG` environment variable, e.g. `DEBUG=@acme/foo` or
    /// `DEBUG=@acme/*~trace`. When no entry matches, the level is Warn.
    pub namespace: Option<String>,
    /// A custom adapter called with rendered log messages. If not set,
    /// messages go to stdout.
    pub adapter: Option<Arc<dyn LogAdapter>>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    #[must_use]
    pub fn with_json(mut self, as_json: bool) -> Self {
        self.as_json = Some(as_json);
        self
    }

    #[must_use]
    pub fn with_line_numbers_for_all(mut self, show: bool) -> Self {
        self.show_line_numbers_for_all = Some(show);
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn LogAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }
}

impl fmt::Debug for LogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogOptions")
            .field("level", &self.level)
            .field("use_colors", &self.use_colors)
            .field("as_json", &self.as_json)
            .field(
                "show_line_numbers_for_all",
                &self.show_line_numbers_for_all,
            )
            .field("namespace", &self.namespace)
            .field("adapter", &self.adapter.as_ref().map(|_| "<custom>"))
            .finish()
    }
}
