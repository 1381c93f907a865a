//! Built-in internal frame patterns
//!
//! Frames produced by runtime bootstrap code, internal modules, or explicitly
//! ignored packages carry no signal for the reader of a cleaned trace. This
//! module compiles the rules that identify them. The seed set is a default,
//! not a contract: callers can replace it wholesale through
//! [`StackOptions::internals`](crate::stack::StackOptions).

use regex::Regex;

/// Seed patterns for runtime-internal frames.
///
/// Matches bootstrap frames, internal module frames, the main-module runner,
/// and spawn-wrap shim frames.
pub fn runtime_internals() -> Vec<Regex> {
    [
        r"\s*at (bootstrap_)?node\.js:\d+:\d+?$",
        r"\(internal/[^:]+:\d+:\d+\)$",
        r"\s*at internal[/]main[/]run_main_module\.js:\d+:\d+$",
        r"/\.node-spawn-wrap-\w+-\w+/node:\d+:\d+\)?$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

/// Combine a list of package names into one pattern matching any frame that
/// points inside those packages, e.g. `.../node_modules/<pkg>/...:12:34`.
///
/// Names are escaped for literal matching. An empty list yields `None` so no
/// pattern is added to the registry.
pub fn ignored_packages_pattern<S: AsRef<str>>(packages: &[S]) -> Option<Regex> {
    if packages.is_empty() {
        return None;
    }

    let escaped = packages
        .iter()
        .map(|pkg| regex::escape(pkg.as_ref()))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(
        r"[/\\]node_modules[/\\](?:{escaped})[/\\][^:]+:\d+:\d+"
    ))
    .ok()
}
