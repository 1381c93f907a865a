//! Namespace verbosity derived from the `DEBUG` environment variable
//!
//! `DEBUG` is a comma-separated list of entries, each a namespace with an
//! optional `~level` suffix:
//!
//! ```text
//! DEBUG=@acme/checkout,@acme/billing~trace,*~warn
//! ```
//!
//! An entry matches a logger's namespace when it is `*` or when the namespace
//! contains the entry text with any `*` characters removed. The first
//! matching entry wins; its level (Debug when no suffix is given) becomes the
//! logger's effective level.

use super::log_level::LogLevel;

/// The environment variable consulted when a namespace is configured.
pub const DEBUG_ENV: &str = "DEBUG";

/// Split one `namespace~level` entry. A missing or unknown level suffix
/// means Debug, so `DEBUG=my-app` turns debugging on for `my-app`.
fn parse_entry(entry: &str) -> (&str, LogLevel) {
    match entry.split_once('~') {
        Some((namespace, level)) => (namespace, LogLevel::from_str_lossy(level)),
        None => (entry, LogLevel::Debug),
    }
}

/// Resolve the level the `DEBUG` spec assigns to `namespace`, if any entry
/// matches. Callers fall back to their own default on `None`.
pub fn level_for_namespace(namespace: &str, debug_spec: &str) -> Option<LogLevel> {
    if namespace.is_empty() {
        return None;
    }

    for entry in debug_spec.split(',') {
        let (pattern, level) = parse_entry(entry);
        if pattern.is_empty() {
            continue;
        }
        let needle = pattern.replace('*', "");
        if pattern == "*" || namespace.contains(&needle) {
            return Some(level);
        }
    }

    None
}
