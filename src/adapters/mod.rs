//! Output adapters for rendered log messages

pub mod console;
pub mod memory;

pub use console::ConsoleAdapter;
pub use memory::MemoryAdapter;

/// Destination for fully rendered log messages.
///
/// Implemented for any `Fn(&str)` closure, so tests and embedders can route
/// output with a one-liner:
///
/// ```
/// use std::sync::Arc;
/// use stacklog::adapters::LogAdapter;
///
/// let adapter: Arc<dyn LogAdapter> = Arc::new(|message: &str| {
///     eprintln!("{message}");
/// });
/// adapter.write("hello");
/// ```
pub trait LogAdapter: Send + Sync {
    fn write(&self, message: &str);
}

impl<F> LogAdapter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write(&self, message: &str) {
        self(message)
    }
}
