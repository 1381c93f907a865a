//! In-memory adapter for tests and capture

use parking_lot::Mutex;

use super::LogAdapter;

/// Collects every written message into a lock-protected buffer.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    messages: Mutex<Vec<String>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything written so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl LogAdapter for MemoryAdapter {
    fn write(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_messages_in_order() {
        let adapter = MemoryAdapter::new();
        adapter.write("first");
        adapter.write("second");
        assert_eq!(adapter.messages(), vec!["first", "second"]);
        assert_eq!(adapter.len(), 2);
    }

    #[test]
    fn test_clear() {
        let adapter = MemoryAdapter::new();
        adapter.write("one");
        adapter.clear();
        assert!(adapter.is_empty());
    }
}
