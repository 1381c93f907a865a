//! Console adapter implementation

use super::LogAdapter;

/// The default adapter: one line per message to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleAdapter;

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl LogAdapter for ConsoleAdapter {
    fn write(&self, message: &str) {
        println!("{message}");
    }
}
