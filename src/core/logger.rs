//! Main logger implementation

use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::adapters::{ConsoleAdapter, LogAdapter};
use crate::stack::{StackCleaner, StackOptions};

use super::{
    caller::Caller,
    log_level::LogLevel,
    namespace::{level_for_namespace, DEBUG_ENV},
    options::LogOptions,
    payload::LogPayload,
    timestamp,
};

/// Namespace used for this crate's own diagnostic messages. Turn them on
/// with `DEBUG=stacklog`.
const SELF_NAMESPACE: &str = "stacklog";

/// Mutable configuration, reconfigurable at runtime through
/// [`Log::set_options`].
struct LogState {
    level: LogLevel,
    use_colors: bool,
    as_json: bool,
    show_line_numbers_for_all: bool,
    namespace: Option<String>,
    adapter: Arc<dyn LogAdapter>,
}

impl Default for LogState {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            use_colors: true,
            as_json: false,
            show_line_numbers_for_all: false,
            namespace: None,
            adapter: Arc::new(ConsoleAdapter::new()),
        }
    }
}

/// The leveled logging facility.
///
/// Renders messages with severity filtering, colorization, optional JSON
/// structuring, caller-location capture, and namespace-scoped verbosity
/// driven by the `DEBUG` environment variable. Error payloads are rendered
/// through the owned [`StackCleaner`], which is immutable after
/// construction; options live behind a lock so a shared logger can be
/// reconfigured from any thread.
pub struct Log {
    state: RwLock<LogState>,
    cleaner: StackCleaner,
}

impl Log {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LogState::default()),
            cleaner: StackCleaner::default(),
        }
    }

    #[must_use]
    pub fn with_options(options: LogOptions) -> Self {
        Self::with_stack_options(options, StackOptions::default())
    }

    /// Create a logger with explicit stack-cleaning configuration (internal
    /// frame patterns, ignored packages, base directory).
    #[must_use]
    pub fn with_stack_options(options: LogOptions, stack_options: StackOptions) -> Self {
        let log = Self {
            state: RwLock::new(LogState::default()),
            cleaner: StackCleaner::new(stack_options),
        };
        log.set_options(options);
        log
    }

    /// The stack cleaner used to render error payloads.
    pub fn cleaner(&self) -> &StackCleaner {
        &self.cleaner
    }

    /// The currently effective log level.
    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    pub fn namespace(&self) -> Option<String> {
        self.state.read().namespace.clone()
    }

    /// Set logger options. Only the fields that are set are applied.
    ///
    /// Setting a namespace re-derives the level from the `DEBUG` environment
    /// variable, overriding any level supplied in the same call; when no
    /// `DEBUG` entry matches, the level becomes Warn.
    #[track_caller]
    pub fn set_options(&self, options: LogOptions) {
        self.debug_log(format!("Setting options: {options:?}"));

        let mut state = self.state.write();

        if let Some(as_json) = options.as_json {
            state.as_json = as_json;
        }
        if let Some(use_colors) = options.use_colors {
            state.use_colors = use_colors;
        }
        if let Some(level) = options.level {
            state.level = level;
        }
        if let Some(adapter) = options.adapter {
            state.adapter = adapter;
        }
        if let Some(show) = options.show_line_numbers_for_all {
            state.show_line_numbers_for_all = show;
        }
        if let Some(namespace) = options.namespace {
            if !namespace.is_empty() {
                let spec = std::env::var(DEBUG_ENV).unwrap_or_default();
                state.level =
                    level_for_namespace(&namespace, &spec).unwrap_or(LogLevel::Warn);
                state.namespace = Some(namespace);
            }
        }
    }

    /// Trace level logs that go beyond just normal debug messages. A silly log level.
    #[track_caller]
    pub fn trace(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Trace, vec![message.into()], Location::caller());
    }

    /// Debug messages used during development.
    #[track_caller]
    pub fn debug(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Debug, vec![message.into()], Location::caller());
    }

    /// Informational messages
    #[track_caller]
    pub fn info(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Info, vec![message.into()], Location::caller());
    }

    /// Something bad might have happened and it should be investigated, but we can continue.
    #[track_caller]
    pub fn warn(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Warn, vec![message.into()], Location::caller());
    }

    /// Something bad happened, but we can continue or recover.
    #[track_caller]
    pub fn error(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Error, vec![message.into()], Location::caller());
    }

    /// Something critical happened that likely had unintended or fatal consequences
    #[track_caller]
    pub fn crit(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Crit, vec![message.into()], Location::caller());
    }

    /// Something happened and we must immediately stop
    #[track_caller]
    pub fn fatal(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::Fatal, vec![message.into()], Location::caller());
    }

    /// Really important information that is ALWAYS logged
    #[track_caller]
    pub fn super_info(&self, message: impl Into<LogPayload>) {
        self.dispatch(LogLevel::SuperInfo, vec![message.into()], Location::caller());
    }

    /// Log a single payload at the given level.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<LogPayload>) {
        self.dispatch(level, vec![message.into()], Location::caller());
    }

    /// Log several payloads under one header line.
    #[track_caller]
    pub fn log_all(&self, level: LogLevel, payloads: Vec<LogPayload>) {
        self.dispatch(level, payloads, Location::caller());
    }

    /// Start a timer. Pass the result to [`Log::timer_end`] to get the
    /// elapsed time.
    pub fn timer_start(&self) -> Instant {
        Instant::now()
    }

    /// Returns the elapsed time in milliseconds.
    pub fn timer_end(&self, start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }

    fn dispatch(&self, level: LogLevel, payloads: Vec<LogPayload>, location: &Location<'_>) {
        self.handle_log(level, payloads, location, false, None);
    }

    fn handle_log(
        &self,
        level: LogLevel,
        payloads: Vec<LogPayload>,
        location: &Location<'_>,
        force: bool,
        namespace_override: Option<&str>,
    ) {
        let state = self.state.read();
        if !force && level < state.level {
            return;
        }

        let namespace = namespace_override.or(state.namespace.as_deref());
        let now = timestamp::datetime_string();
        let caller = (state.show_line_numbers_for_all || level <= LogLevel::Debug)
            .then(|| Caller::new(location, self.cleaner.cwd()));

        if state.as_json {
            let record = self.json_record(namespace, &now, level, &payloads, caller.as_ref());
            state
                .adapter
                .write(&colorize(&record, level, state.use_colors));
            return;
        }

        let namespace_str = namespace
            .map(|ns| format!("[{ns}] "))
            .unwrap_or_default();
        let caller_str = caller
            .map(|caller| format!(" | {}", caller.location_string()))
            .unwrap_or_default();
        let header = format!("{namespace_str}({} | {now}{caller_str}): ", level.label());

        if let [LogPayload::Text(text)] = payloads.as_slice() {
            let body = colorize(text, level, state.use_colors);
            state.adapter.write(&format!("{header}{body}"));
        } else {
            state.adapter.write(&header);
            for payload in &payloads {
                let rendered = payload.render(&self.cleaner, namespace.is_some());
                state
                    .adapter
                    .write(&colorize(&rendered, level, state.use_colors));
            }
        }
    }

    /// One serialized object per call; fields without a value are omitted.
    fn json_record(
        &self,
        namespace: Option<&str>,
        now: &str,
        level: LogLevel,
        payloads: &[LogPayload],
        caller: Option<&Caller>,
    ) -> String {
        let mut record = Map::new();
        if let Some(namespace) = namespace {
            record.insert("namespace".into(), Value::String(namespace.to_string()));
        }
        record.insert("timestamp".into(), Value::String(now.to_string()));
        record.insert("level".into(), Value::String(level.to_str().to_string()));
        record.insert(
            "message".into(),
            Value::Array(payloads.iter().map(LogPayload::to_json).collect()),
        );
        if let Some(caller) = caller {
            record.insert(
                "caller".into(),
                serde_json::to_value(caller).unwrap_or(Value::Null),
            );
        }
        Value::Object(record).to_string()
    }

    /// Logs a debug message about stacklog itself, gated on
    /// `DEBUG=stacklog` so embedders never see it by accident.
    #[track_caller]
    fn debug_log(&self, message: String) {
        let spec = std::env::var(DEBUG_ENV).unwrap_or_default();
        let Some(level) = level_for_namespace(SELF_NAMESPACE, &spec) else {
            return;
        };
        if level <= LogLevel::Debug {
            self.handle_log(
                LogLevel::Debug,
                vec![LogPayload::Text(message)],
                Location::caller(),
                true,
                Some(SELF_NAMESPACE),
            );
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

fn colorize(text: &str, level: LogLevel, use_colors: bool) -> String {
    if use_colors {
        text.color(level.color_code()).to_string()
    } else {
        text.to_string()
    }
}
