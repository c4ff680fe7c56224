#![deny(missing_docs)]
//! Shared logging utilities for the llms.txt client workspace.
//!
//! This crate provides the `llms_*` logging macros used by the core, the
//! engine and the app, plus a test initializer for the global logger.
//! Messages are tagged with the session they belong to when one is set on
//! the current thread, so interleaved sessions stay readable in the log.

use std::cell::Cell;

thread_local! {
    /// Session id the current thread is working on, 0 when none.
    static CURRENT_SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Marks `session_id` as the session the current thread is working on.
pub fn set_current_session(session_id: u64) {
    CURRENT_SESSION.with(|v| v.set(session_id));
}

/// Clears the session marker of the current thread.
pub fn clear_current_session() {
    CURRENT_SESSION.with(|v| v.set(0));
}

/// Returns the session id set on the current thread, or 0 if none is set.
pub fn current_session() -> u64 {
    CURRENT_SESSION.with(|v| v.get())
}

#[doc(hidden)]
pub fn __session_prefix() -> String {
    match current_session() {
        0 => String::new(),
        id => format!("[session {id}] "),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! llms_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::__session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! llms_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::__session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! llms_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::__session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! llms_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::__session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! llms_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::__session_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
