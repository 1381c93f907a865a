//! Log payloads
//!
//! Every argument to a log call is one [`LogPayload`]: plain text, a JSON
//! value, or an error with its stack trace. Rendering of errors runs the
//! stack through the cleaner owned by the logger.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::stack::StackCleaner;

/// The tab size of a JSON value when pretty-printed.
const OBJECT_SPACE_WIDTH: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq)]
pub enum LogPayload {
    Text(String),
    Json(Value),
    Error {
        message: String,
        stack: Option<String>,
    },
}

impl LogPayload {
    /// An error payload with an optional raw stack trace.
    pub fn error(message: impl Into<String>, stack: Option<String>) -> Self {
        LogPayload::Error {
            message: message.into(),
            stack,
        }
    }

    /// Render for text output.
    ///
    /// With `add_indentation` (set when the logger has a namespace), text and
    /// JSON renderings are nested two spaces under the header line. Error
    /// renderings are never indented; the cleaned stack carries its own
    /// layout.
    pub fn render(&self, cleaner: &StackCleaner, add_indentation: bool) -> String {
        match self {
            LogPayload::Text(text) => {
                if add_indentation {
                    format!("  {text}")
                } else {
                    text.clone()
                }
            }
            LogPayload::Json(value) => {
                let mut rendered = pretty_json(value);
                if add_indentation {
                    rendered = format!("  {}", rendered.replace('\n', "\n  "));
                }
                rendered
            }
            LogPayload::Error { message, stack } => {
                let cleaned = stack
                    .as_deref()
                    .and_then(|stack| cleaner.clean(stack, 0))
                    .unwrap_or_default();
                format!("Error: {message}\n\n{cleaned}")
            }
        }
    }

    /// The JSON-record form: text and JSON values pass through; errors become
    /// `{message, stack: [lines]}` with the raw stack split per line.
    pub fn to_json(&self) -> Value {
        match self {
            LogPayload::Text(text) => Value::String(text.clone()),
            LogPayload::Json(value) => value.clone(),
            LogPayload::Error { message, stack } => {
                let mut error = Map::new();
                error.insert("message".into(), Value::String(message.clone()));
                if let Some(stack) = stack {
                    error.insert(
                        "stack".into(),
                        Value::Array(
                            stack
                                .split('\n')
                                .map(|line| Value::String(line.to_string()))
                                .collect(),
                        ),
                    );
                }
                Value::Object(error)
            }
        }
    }
}

impl From<&str> for LogPayload {
    fn from(text: &str) -> Self {
        LogPayload::Text(text.to_string())
    }
}

impl From<String> for LogPayload {
    fn from(text: String) -> Self {
        LogPayload::Text(text)
    }
}

impl From<&String> for LogPayload {
    fn from(text: &String) -> Self {
        LogPayload::Text(text.clone())
    }
}

impl From<Value> for LogPayload {
    fn from(value: Value) -> Self {
        LogPayload::Json(value)
    }
}

/// Pretty-print with a four-space indent.
fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(OBJECT_SPACE_WIDTH);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut serializer).is_ok() {
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        value.to_string()
    }
}
