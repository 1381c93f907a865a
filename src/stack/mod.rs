//! Stack trace parsing and cleaning
//!
//! Raw stack traces are runtime-dependent text: frames from application code
//! are interleaved with bootstrap and internal-module noise, paths are
//! absolute, and header lines float free of the frames they describe. This
//! module parses frame lines into structured fields and produces a cleaned,
//! de-noised rendering suitable for log output.

pub mod cleaner;
pub mod frame;
pub mod internals;

pub use cleaner::{StackCleaner, StackOptions};
pub use frame::ParsedFrame;
pub use internals::{ignored_packages_pattern, runtime_internals};
