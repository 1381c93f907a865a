//! Caller location capture
//!
//! Call sites are captured through `#[track_caller]` and
//! [`std::panic::Location`], so no global stack hooks need to be swapped and
//! restored around the capture.

use std::panic::Location;

use serde::Serialize;

/// The call site a log message originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub full_file_path: String,
    /// The file path relativized against the logger's base directory.
    pub relative_file_path: String,
    pub line: u32,
    pub column: u32,
}

impl Caller {
    /// Build a caller from a captured location, relativizing its path
    /// against `cwd` (already slash-normalized).
    pub fn new(location: &Location<'_>, cwd: &str) -> Self {
        let full = location.file().replace('\\', "/");
        let relative = match cwd {
            "" => full.clone(),
            cwd => full
                .strip_prefix(&format!("{cwd}/"))
                .map(str::to_string)
                .unwrap_or_else(|| full.clone()),
        };

        Self {
            full_file_path: full,
            relative_file_path: relative,
            line: location.line(),
            column: location.column(),
        }
    }

    /// The `file:line:column` string rendered in text log headers.
    pub fn location_string(&self) -> String {
        format!("{}:{}:{}", self.relative_file_path, self.line, self.column)
    }
}
