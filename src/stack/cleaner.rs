//! Stack trace cleaning
//!
//! Raw traces interleave noisy runtime and bootstrap frames with meaningful
//! application frames. [`StackCleaner`] filters the noise, relativizes paths
//! against a base directory, and re-indents continuation text so that header
//! lines stay adjacent to the frames that follow them.

use std::path::Path;

use regex::Regex;

use super::frame::{parse_frame_line, split_position, ParsedFrame};
use super::internals::{ignored_packages_pattern, runtime_internals};

/// Configuration accepted by [`StackCleaner::new`].
///
/// Every field is optional: by default the built-in runtime internals are
/// filtered, no packages are ignored, and paths are relativized against the
/// process working directory.
#[derive(Debug, Default)]
pub struct StackOptions {
    internals: Option<Vec<Regex>>,
    ignored_packages: Vec<String>,
    cwd: Option<String>,
}

impl StackOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in internal-frame patterns wholesale.
    #[must_use]
    pub fn with_internals(mut self, internals: Vec<Regex>) -> Self {
        self.internals = Some(internals);
        self
    }

    /// Add package names whose frames are filtered from cleaned output.
    #[must_use]
    pub fn with_ignored_packages<S: Into<String>>(
        mut self,
        packages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.ignored_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the base directory used for path relativization.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_string_lossy().into_owned());
        self
    }
}

/// The two-state rewrite machine used while cleaning.
///
/// Lines start in the accumulating state: each is fully trimmed and loses
/// its leading `at ` marker. The first retained non-frame line switches to
/// the outdented state, where leading whitespace survives so continuation
/// text stays visually nested. The one-line `deferred` buffer holds the most
/// recent non-frame line until the next frame line flushes it, which keeps a
/// header adjacent to its frames even when filtered noise sat between them.
#[derive(Debug, Default)]
struct OutdentState {
    outdented: bool,
    deferred: Option<String>,
}

impl OutdentState {
    /// Rewrite one retained line, stripping the `at ` marker. A marker
    /// directly before a paren group belongs to a function literally named
    /// `at` on an already-cleaned line and is left alone, so re-cleaning
    /// does not eat the name.
    fn rewrite(&self, line: &str, has_marker: bool) -> String {
        if self.outdented {
            let trimmed = line.trim_end();
            let indent_len = trimmed.len() - trimmed.trim_start().len();
            if indent_len > 0 && trimmed[indent_len..].starts_with("at ") {
                let rest = &trimmed[indent_len + 3..];
                if rest.starts_with('(') {
                    trimmed.to_string()
                } else {
                    format!("{}{}", &trimmed[..indent_len], rest)
                }
            } else {
                trimmed.to_string()
            }
        } else {
            let trimmed = line.trim();
            if has_marker {
                let rest = trimmed.strip_prefix("at ").unwrap_or("");
                if rest.starts_with('(') {
                    trimmed.to_string()
                } else {
                    rest.to_string()
                }
            } else {
                trimmed.to_string()
            }
        }
    }
}

/// Filters and normalizes raw stack trace text.
///
/// The compiled pattern set and base directory are fixed at construction and
/// never mutated, so a shared cleaner is safe to call from any thread.
#[derive(Debug)]
pub struct StackCleaner {
    internals: Vec<Regex>,
    cwd: String,
}

impl StackCleaner {
    pub fn new(options: StackOptions) -> Self {
        let mut internals = options.internals.unwrap_or_else(runtime_internals);
        if let Some(packages) = ignored_packages_pattern(&options.ignored_packages) {
            internals.push(packages);
        }

        let cwd = options
            .cwd
            .or_else(|| {
                std::env::current_dir()
                    .ok()
                    .map(|dir| dir.to_string_lossy().into_owned())
            })
            .unwrap_or_default()
            .replace('\\', "/");

        Self { internals, cwd }
    }

    /// The slash-normalized base directory paths are relativized against.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Parse one frame line into structured fields.
    ///
    /// Returns `None` when the line does not fit the frame grammar; the
    /// caller should pass such text through unchanged.
    pub fn parse_line(&self, line: &str) -> Option<ParsedFrame> {
        parse_frame_line(line, &self.cwd)
    }

    /// Clean a multi-line trace. Returns `None` when there is no input at
    /// all; each retained line in the result is indented by `indent` spaces
    /// and terminated with a newline.
    pub fn clean(&self, stack: &str, indent: usize) -> Option<String> {
        if stack.is_empty() {
            return None;
        }
        Some(self.clean_lines(stack.split('\n'), indent))
    }

    /// Clean an already-split trace. An empty sequence yields an empty
    /// string.
    pub fn clean_lines<'a, I>(&self, lines: I, indent: usize) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines.into_iter().collect();

        // An error-message header ahead of the first frame is noise here;
        // it is re-attached by the caller. Requiring a raw marker on the
        // second line keeps the skip from firing again on cleaned output.
        let start = usize::from(
            lines.len() >= 2 && !has_frame_marker(lines[0]) && has_raw_marker(lines[1]),
        );

        let mut state = OutdentState::default();
        let mut retained: Vec<String> = Vec::new();

        for raw in &lines[start..] {
            let line = raw.replace('\\', "/");

            if self.internals.iter().any(|internal| internal.is_match(&line)) {
                continue;
            }

            let has_marker = has_frame_marker(&line);
            let is_frame = has_marker || has_location_tail(&line);
            let mut line = state.rewrite(&line, has_marker);

            if !self.cwd.is_empty() {
                line = line.replacen(&format!("{}/", self.cwd), "", 1);
            }

            if line.is_empty() {
                continue;
            }

            if is_frame {
                if let Some(header) = state.deferred.take() {
                    retained.push(header);
                }
                retained.push(line);
            } else {
                state.outdented = true;
                state.deferred = Some(line);
            }
        }

        let pad = " ".repeat(indent);
        retained
            .iter()
            .map(|line| format!("{pad}{line}\n"))
            .collect()
    }
}

impl Default for StackCleaner {
    fn default() -> Self {
        Self::new(StackOptions::default())
    }
}

/// The conventional `at ` marker, after any leading whitespace.
fn has_frame_marker(line: &str) -> bool {
    line.trim_start().starts_with("at ")
}

/// A marker that still needs stripping. The text after a raw marker is a
/// name or a location, never a bare paren group; a cleaned line for a
/// function literally named `at` (`at (lib/x.js:1:2)`) is not raw.
fn has_raw_marker(line: &str) -> bool {
    match line.trim_start().strip_prefix("at ") {
        Some(rest) => !rest.starts_with('('),
        None => false,
    }
}

/// The parenthesized location tail a cleaned frame line keeps after its
/// marker is stripped, e.g. `handler (lib/server.js:10:4)` or
/// `run (native)`. Recognizing the tail keeps cleaning stable over its own
/// output. Message text that merely ends in a `:line:column` run, like
/// `Error: timed out at 12:30:45`, does not qualify.
fn has_location_tail(line: &str) -> bool {
    let trimmed = line.trim_end();
    let Some(open) = trimmed.rfind(" (") else {
        return false;
    };
    let Some(inner) = trimmed[open + 2..].strip_suffix(')') else {
        return false;
    };
    inner == "native" || split_position(inner).is_some()
}
