//! Stack frame parsing
//!
//! Parses one textual stack frame into structured fields. The grammar is
//! implemented as an explicit tokenizer instead of a single composite
//! pattern; each optional segment is tried the way a backtracking matcher
//! would try it, so lines that only almost fit the grammar still resolve the
//! same way:
//!
//! ```text
//! [at ] [new ] [function (] [eval at origin (file:line:col), ] file:line:col | native [)]
//! ```
//!
//! A line that does not fit the grammar at all is not an error; parsing
//! returns `None` and the caller treats the text as opaque.

use serde::{Deserialize, Serialize};

/// Structured representation of one stack frame.
///
/// All location fields are optional: a `native` frame carries no
/// file/line/column at all, and a frame inside dynamically evaluated code
/// additionally carries the eval origin and the location within the
/// evaluated source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Method alias from `name [as alias]` syntax, kept only when it differs
    /// from `function`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub is_native: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_column: Option<u32>,
}

/// Raw capture groups for one frame body, before normalization.
#[derive(Debug, Default)]
struct FrameBody<'a> {
    function: Option<&'a str>,
    eval: Option<EvalClause<'a>>,
    file: Option<&'a str>,
    line: Option<&'a str>,
    column: Option<&'a str>,
    native: bool,
    close_paren: bool,
}

#[derive(Debug)]
struct EvalClause<'a> {
    origin: &'a str,
    file: &'a str,
    line: &'a str,
    column: &'a str,
}

/// Parse a single frame line against the frame grammar.
///
/// `cwd` must already be slash-normalized; when the file path starts with
/// `<cwd>/` that prefix is stripped.
pub(crate) fn parse_frame_line(line: &str, cwd: &str) -> Option<ParsedFrame> {
    if line.is_empty() {
        return None;
    }

    let (body, is_constructor) = parse_marker(line)?;
    Some(assemble(body, is_constructor, cwd))
}

/// Optional leading `at ` marker, with any amount of leading whitespace.
///
/// The marker is only consumed when the rest of the line still parses; a
/// line like `at :1:2` falls back to treating `at ` as part of the file.
fn parse_marker(line: &str) -> Option<(FrameBody<'_>, bool)> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("at ") {
        if let Some(parsed) = parse_constructor(rest) {
            return Some(parsed);
        }
    }
    parse_constructor(line)
}

/// Optional `new ` constructor marker, with the same fallback rule.
fn parse_constructor(s: &str) -> Option<(FrameBody<'_>, bool)> {
    if let Some(rest) = s.strip_prefix("new ") {
        if let Some(body) = parse_body(rest) {
            return Some((body, true));
        }
    }
    parse_body(s).map(|body| (body, false))
}

/// Optional function-name segment ending in ` (`.
///
/// The name can contain anything, including ` (` itself, so every split
/// point is tried left to right; the first one whose tail parses as a
/// location wins. A line with no viable split has no function segment.
fn parse_body(s: &str) -> Option<FrameBody<'_>> {
    for (idx, _) in s.match_indices(" (") {
        let tail = &s[idx + 2..];
        if let Some(mut body) = parse_location(tail) {
            body.function = Some(&s[..idx]);
            return Some(body);
        }
    }
    parse_location(s)
}

/// Optional eval clause `eval at <origin> (<file>:<line>:<col>), ` followed
/// by the final location.
fn parse_location(s: &str) -> Option<FrameBody<'_>> {
    if let Some(after) = s.strip_prefix("eval at ") {
        if let Some(space) = after.find(' ') {
            let origin = &after[..space];
            if let Some(inner) = after[space + 1..].strip_prefix('(') {
                // The eval file is the shortest prefix followed by
                // `:line:col), `; later colons are retried if the remainder
                // of the line fails to parse.
                for (idx, _) in inner.match_indices(':') {
                    if idx == 0 {
                        continue;
                    }
                    let Some((line, column, rest)) = eval_position(&inner[idx..]) else {
                        continue;
                    };
                    if let Some(mut body) = parse_final(rest) {
                        body.eval = Some(EvalClause {
                            origin,
                            file: &inner[..idx],
                            line,
                            column,
                        });
                        return Some(body);
                    }
                }
            }
        }
    }
    parse_final(s)
}

/// Match `:<digits>:<digits>), ` at the start of `s`, returning the two
/// digit runs and the remainder after `), `.
fn eval_position(s: &str) -> Option<(&str, &str, &str)> {
    let s = s.strip_prefix(':')?;
    let line_end = digit_run(s)?;
    let (line, rest) = s.split_at(line_end);
    let rest = rest.strip_prefix(':')?;
    let col_end = digit_run(rest)?;
    let (column, rest) = rest.split_at(col_end);
    let rest = rest.strip_prefix("), ")?;
    Some((line, column, rest))
}

/// Length of the leading run of ASCII digits, `None` if empty.
fn digit_run(s: &str) -> Option<usize> {
    let end = s
        .as_bytes()
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    (end > 0).then_some(end)
}

/// The final `file:line:column` triple or the literal `native` marker, with
/// an optional closing parenthesis at the very end.
fn parse_final(s: &str) -> Option<FrameBody<'_>> {
    let (body, close_paren) = match s.strip_suffix(')') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };

    // file:line:column; line and column are the two trailing numeric
    // components, so earlier colons in the path never confuse the split.
    if let Some((file, line, column)) = split_position(body) {
        return Some(FrameBody {
            file: Some(file),
            line: Some(line),
            column: Some(column),
            close_paren,
            ..FrameBody::default()
        });
    }

    if body == "native" {
        return Some(FrameBody {
            native: true,
            close_paren,
            ..FrameBody::default()
        });
    }

    None
}

/// Split `file:line:column` from the end; the file part must be non-empty.
pub(crate) fn split_position(s: &str) -> Option<(&str, &str, &str)> {
    let (rest, column) = trailing_digits(s)?;
    let rest = rest.strip_suffix(':')?;
    let (rest, line) = trailing_digits(rest)?;
    let file = rest.strip_suffix(':')?;
    (!file.is_empty()).then_some((file, line, column))
}

/// Split off the trailing run of ASCII digits, `None` if empty.
fn trailing_digits(s: &str) -> Option<(&str, &str)> {
    let start = s.len()
        - s.as_bytes()
            .iter()
            .rev()
            .take_while(|b| b.is_ascii_digit())
            .count();
    (start < s.len()).then(|| s.split_at(start))
}

/// Build the [`ParsedFrame`] from raw captures: paren repair, method alias
/// split, path normalization, numeric conversion.
fn assemble(body: FrameBody<'_>, is_constructor: bool, cwd: &str) -> ParsedFrame {
    let mut frame = ParsedFrame {
        is_constructor,
        is_native: body.native,
        line: body.line.and_then(|n| n.parse().ok()),
        column: body.column.and_then(|n| n.parse().ok()),
        ..ParsedFrame::default()
    };

    let mut function = body.function.map(str::to_string);
    let mut file = body.file.map(str::to_string);

    if body.close_paren {
        if let Some(captured) = file.take() {
            let (repaired_file, repaired_function) =
                repair_parens(&captured, function.as_deref());
            file = Some(repaired_file);
            if let Some(name) = repaired_function {
                function = Some(name);
            }
        }
    }

    let mut method = None;
    if let Some(name) = function.take() {
        let (base, alias) = split_method_alias(&name);
        if !base.is_empty() {
            frame.function = Some(base.to_string());
        }
        if let Some(alias) = alias {
            if !alias.is_empty() && alias != base {
                method = Some(alias.to_string());
            }
        }
    }
    frame.method = method;

    if let Some(file) = file {
        frame.file = normalize_file(&file, cwd);
    }

    if let Some(eval) = body.eval {
        frame.eval_origin = Some(eval.origin.to_string());
        frame.eval_line = eval.line.parse().ok();
        frame.eval_column = eval.column.parse().ok();
        frame.eval_file = Some(eval.file.replace('\\', "/"));
    }

    frame
}

/// Re-balance a file capture that swallowed part of the function name.
///
/// When the closing paren was consumed, a function name containing literal
/// parens mis-captures as part of the file, e.g. `asdf) [as foo] (xyz.js`.
/// Walking backwards, the last unbalanced `(` preceded by a space marks the
/// real boundary: everything before it rejoins the function name as
/// ` (<prefix>`, everything after it is the corrected file.
fn repair_parens(file: &str, function: Option<&str>) -> (String, Option<String>) {
    let chars: Vec<char> = file.chars().collect();
    let mut closes = 0i32;

    for i in (1..chars.len()).rev() {
        if chars[i] == ')' {
            closes += 1;
        } else if chars[i] == '(' && chars[i - 1] == ' ' {
            closes -= 1;
            if closes == -1 {
                let before: String = chars[..i - 1].iter().collect();
                let after: String = chars[i + 1..].iter().collect();
                let name = format!("{} ({}", function.unwrap_or_default(), before);
                return (after, Some(name));
            }
        }
    }

    (file.to_string(), None)
}

/// Split `name [as alias]` into its parts; a name without the alias syntax
/// comes back unchanged with no alias.
fn split_method_alias(name: &str) -> (&str, Option<&str>) {
    if let Some(stripped) = name.strip_suffix(']') {
        if let Some(pos) = stripped.find(" [as ") {
            return (&stripped[..pos], Some(&stripped[pos + 5..]));
        }
    }
    (name, None)
}

/// Normalize path separators and relativize against the base directory.
fn normalize_file(file: &str, cwd: &str) -> Option<String> {
    if file.is_empty() {
        return None;
    }
    let mut normalized = file.replace('\\', "/");
    if !cwd.is_empty() {
        if let Some(relative) = normalized.strip_prefix(&format!("{cwd}/")) {
            normalized = relative.to_string();
        }
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<ParsedFrame> {
        parse_frame_line(line, "")
    }

    #[test]
    fn test_plain_frame() {
        let frame = parse("at foo (bar.js:10:5)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("foo"));
        assert_eq!(frame.file.as_deref(), Some("bar.js"));
        assert_eq!(frame.line, Some(10));
        assert_eq!(frame.column, Some(5));
        assert!(!frame.is_constructor);
        assert!(!frame.is_native);
        assert!(frame.eval_origin.is_none());
    }

    #[test]
    fn test_frame_with_leading_whitespace() {
        let frame = parse("    at foo (bar.js:10:5)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("foo"));
        assert_eq!(frame.file.as_deref(), Some("bar.js"));
    }

    #[test]
    fn test_bare_location() {
        let frame = parse("at bar.js:10:5").unwrap();
        assert!(frame.function.is_none());
        assert_eq!(frame.file.as_deref(), Some("bar.js"));
        assert_eq!(frame.line, Some(10));
        assert_eq!(frame.column, Some(5));
    }

    #[test]
    fn test_constructor_frame() {
        let frame = parse("at new Foo (bar.js:1:1)").unwrap();
        assert!(frame.is_constructor);
        assert_eq!(frame.function.as_deref(), Some("Foo"));
        assert_eq!(frame.file.as_deref(), Some("bar.js"));
        assert_eq!(frame.line, Some(1));
        assert_eq!(frame.column, Some(1));
    }

    #[test]
    fn test_native_frame_has_no_location() {
        let frame = parse("at Object.<anonymous> (native)").unwrap();
        assert!(frame.is_native);
        assert!(frame.file.is_none());
        assert!(frame.line.is_none());
        assert!(frame.column.is_none());
        assert_eq!(frame.function.as_deref(), Some("Object.<anonymous>"));
    }

    #[test]
    fn test_bare_native() {
        let frame = parse("at native").unwrap();
        assert!(frame.is_native);
        assert!(frame.function.is_none());
    }

    #[test]
    fn test_method_alias() {
        let frame = parse("at Foo.bar [as baz] (quux.js:2:3)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("Foo.bar"));
        assert_eq!(frame.method.as_deref(), Some("baz"));
    }

    #[test]
    fn test_method_alias_equal_to_function_is_dropped() {
        let frame = parse("at bar [as bar] (quux.js:2:3)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("bar"));
        assert!(frame.method.is_none());
    }

    #[test]
    fn test_eval_frame() {
        let frame =
            parse("at fn (eval at outer (wrapper.js:5:10), <anonymous>:1:2)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("fn"));
        assert_eq!(frame.eval_origin.as_deref(), Some("outer"));
        assert_eq!(frame.eval_file.as_deref(), Some("wrapper.js"));
        assert_eq!(frame.eval_line, Some(5));
        assert_eq!(frame.eval_column, Some(10));
        assert_eq!(frame.file.as_deref(), Some("<anonymous>"));
        assert_eq!(frame.line, Some(1));
        assert_eq!(frame.column, Some(2));
    }

    #[test]
    fn test_paren_repair() {
        // The lazy function split mis-captures `baz) (quux.js` as the file;
        // the repair walk puts `(baz)` back on the name.
        let frame = parse("at Foo.bar (baz) (quux.js:1:2)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("Foo.bar (baz)"));
        assert_eq!(frame.file.as_deref(), Some("quux.js"));
        assert_eq!(frame.line, Some(1));
        assert_eq!(frame.column, Some(2));
    }

    #[test]
    fn test_paren_repair_with_alias() {
        let frame = parse("at (anonymous) [as bar] (baz.js:2:2)").unwrap();
        assert_eq!(frame.function.as_deref(), Some("(anonymous)"));
        assert_eq!(frame.method.as_deref(), Some("bar"));
        assert_eq!(frame.file.as_deref(), Some("baz.js"));
        assert_eq!(frame.line, Some(2));
        assert_eq!(frame.column, Some(2));
    }

    #[test]
    fn test_cwd_stripped_from_file() {
        let frame = parse_frame_line("at foo (/work/app/lib/a.js:3:4)", "/work/app").unwrap();
        assert_eq!(frame.file.as_deref(), Some("lib/a.js"));
    }

    #[test]
    fn test_backslashes_normalized() {
        let frame = parse_frame_line(r"at foo (C:\work\app\lib\a.js:3:4)", "C:/work/app").unwrap();
        assert_eq!(frame.file.as_deref(), Some("lib/a.js"));
    }

    #[test]
    fn test_unrecognized_lines_return_none() {
        assert!(parse("Error: something broke").is_none());
        assert!(parse("").is_none());
        assert!(parse("at ").is_none());
        assert!(parse("completely freeform text").is_none());
    }

    #[test]
    fn test_trailing_position_wins_over_path_colons() {
        let frame = parse("at handler (a:1:2:3:4)").unwrap();
        assert_eq!(frame.file.as_deref(), Some("a:1:2"));
        assert_eq!(frame.line, Some(3));
        assert_eq!(frame.column, Some(4));
    }
}
