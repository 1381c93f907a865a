//! Property-based tests for stacklog using proptest

use proptest::prelude::*;
use stacklog::prelude::*;
use stacklog::stack::runtime_internals;

// ============================================================================
// LogLevel Tests
// ============================================================================

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Crit),
        Just(LogLevel::Fatal),
        Just(LogLevel::SuperInfo),
    ]
}

proptest! {
    /// Test that LogLevel wire-name conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let as_str = level.to_str();
        let parsed: LogLevel = as_str.parse().unwrap();
        assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering is consistent with severity ranks
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        assert_eq!(level1 <= level2, val1 <= val2);
        assert_eq!(level1 < level2, val1 < val2);
        assert_eq!(level1 >= level2, val1 >= val2);
        assert_eq!(level1 > level2, val1 > val2);
    }

    /// Test that lossy level parsing accepts any input without failing
    #[test]
    fn test_log_level_lossy_parse_total(input in ".*") {
        let _ = LogLevel::from_str_lossy(&input);
    }
}

// ============================================================================
// Frame Parser Tests
// ============================================================================

proptest! {
    /// Test that parse_line never panics, whatever the input
    #[test]
    fn test_parse_line_never_panics(line in ".*") {
        let cleaner = StackCleaner::new(StackOptions::new().with_cwd("/work/app"));
        let _ = cleaner.parse_line(&line);
    }

    /// Test that well-formed synthetic frames always parse
    #[test]
    fn test_synthetic_frames_parse(
        // A bare name of `new` would read as the constructor marker instead.
        name in "[A-Za-z_][A-Za-z0-9_.]{0,20}".prop_filter("not the new marker", |n| n != "new"),
        file in "[a-z][a-z0-9/]{0,20}\\.js",
        line in 1u32..100_000,
        column in 1u32..10_000,
    ) {
        let cleaner = StackCleaner::new(StackOptions::new().with_cwd("/work/app"));
        let text = format!("at {name} ({file}:{line}:{column})");
        let frame = cleaner.parse_line(&text).expect("synthetic frame should parse");
        assert_eq!(frame.function.as_deref(), Some(name.as_str()));
        assert_eq!(frame.file.as_deref(), Some(file.as_str()));
        assert_eq!(frame.line, Some(line));
        assert_eq!(frame.column, Some(column));
    }

    /// Test that native frames never carry location fields
    #[test]
    fn test_native_frames_have_no_location(name in "[A-Za-z_][A-Za-z0-9_.]{0,20}") {
        let cleaner = StackCleaner::default();
        let frame = cleaner
            .parse_line(&format!("at {name} (native)"))
            .expect("native frame should parse");
        assert!(frame.is_native);
        assert!(frame.file.is_none());
        assert!(frame.line.is_none());
        assert!(frame.column.is_none());
    }
}

// ============================================================================
// Trace Cleaner Tests
// ============================================================================

/// A mix of application frames, internal frames, and free-form header text,
/// including a message whose tail is shaped like a `:line:column` run.
fn any_trace_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,10}".prop_map(|f| format!("    at {f} (/work/app/lib/{f}.js:3:7)")),
        Just("    at Module._compile (internal/modules/cjs/loader.js:999:30)".to_string()),
        Just("    at internal/main/run_main_module.js:17:11".to_string()),
        "[A-Za-z ]{1,20}".prop_map(|text| format!("Error: {text}")),
        Just("Error: Connection to 10.0.0.1:80:0".to_string()),
    ]
}

proptest! {
    /// Test that internal-pattern lines never survive cleaning
    #[test]
    fn test_internal_lines_never_survive(lines in prop::collection::vec(any_trace_line(), 0..12)) {
        let cleaner = StackCleaner::new(StackOptions::new().with_cwd("/work/app"));
        let internals = runtime_internals();

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let out = cleaner.clean_lines(refs, 0);

        for line in out.lines() {
            assert!(
                !internals.iter().any(|re| re.is_match(line)),
                "internal line survived cleaning: {line:?}"
            );
        }
    }

    /// Test that cleaning its own output changes nothing
    #[test]
    fn test_clean_is_idempotent(lines in prop::collection::vec(any_trace_line(), 0..12)) {
        let cleaner = StackCleaner::new(StackOptions::new().with_cwd("/work/app"));

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let once = cleaner.clean_lines(refs, 0);
        let twice = cleaner.clean_lines(once.lines(), 0);
        assert_eq!(once, twice);
    }

    /// Test that every retained line carries the requested indentation
    #[test]
    fn test_indentation_prefixes_every_line(
        lines in prop::collection::vec(any_trace_line(), 0..12),
        indent in 0usize..8,
    ) {
        let cleaner = StackCleaner::new(StackOptions::new().with_cwd("/work/app"));

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let out = cleaner.clean_lines(refs, indent);

        for line in out.lines() {
            assert!(line.starts_with(&" ".repeat(indent)), "missing indent: {line:?}");
        }
    }

    /// Test that clean never panics on arbitrary multi-line text
    #[test]
    fn test_clean_never_panics(stack in ".*") {
        let cleaner = StackCleaner::default();
        let _ = cleaner.clean(&stack, 0);
    }
}
