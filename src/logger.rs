//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `ProgressLine` for single-line progress display with multiple counters
//! - `Diagnostics` sink injected into the feed core for non-fatal notices
//!
//! Everything is written to stderr: stdout may be carrying the feed itself.
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("ingest"; "scanning {} documents", count);
//!
//! // Progress line for ingestion
//! let progress = ProgressLine::new(&[("documents", 69)]);
//! progress.inc("documents");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stderr = stderr().lock();

    // Progress line is redrawn on its next update
    if BAR_COUNT.load(Ordering::SeqCst) > 0 {
        execute!(stderr, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "atom" => prefix.bright_blue().bold().to_string(),
        "ingest" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Diagnostics Sink
// ============================================================================

/// Receiver for non-fatal notices raised while locating content or rendering.
///
/// The feed core never logs directly; it reports through this sink so that
/// tests can observe notices without touching process-wide state.
pub trait Diagnostics: Send + Sync {
    fn notice(&self, module: &str, message: &str);
}

/// Forwards notices to the terminal logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn notice(&self, module: &str, message: &str) {
        log(module, message);
    }
}

/// Records notices in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectDiagnostics {
    notices: Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl CollectDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far, as `(module, message)` pairs.
    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

#[cfg(test)]
impl Diagnostics for CollectDiagnostics {
    fn notice(&self, module: &str, message: &str) {
        self.notices
            .lock()
            .push((module.to_string(), message.to_string()));
    }
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[ingest] documents(42/69)`
///
/// All counters update in place on the same line. Uses `try_lock` to avoid
/// blocking worker threads - if display is busy, the update is skipped
pub struct ProgressLine {
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display.
    ///
    /// Only includes counters with total > 0.
    pub fn new(items: &[(&'static str, usize)]) -> Self {
        let counters: Vec<_> = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|(name, total)| Counter {
                name,
                total: *total,
                current: AtomicUsize::new(0),
            })
            .collect();

        BAR_COUNT.store(1, Ordering::SeqCst);

        let progress = Self {
            counters,
            lock: Mutex::new(()),
        };
        progress.display(false);
        progress
    }

    /// Increment the counter with the given name.
    ///
    /// Non-blocking: if display lock is held, skips refresh.
    #[inline]
    pub fn inc(&self, name: &str) {
        for counter in &self.counters {
            if counter.name == name {
                counter.current.fetch_add(1, Ordering::Relaxed);
                if let Some(_guard) = self.lock.try_lock() {
                    self.display(false);
                }
                return;
            }
        }
    }

    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Overwrite the current line; `newline` keeps it on screen for good.
    fn display(&self, newline: bool) {
        let prefix = colorize_prefix("ingest", "ingest");
        let line = self.line();

        let mut stderr = stderr().lock();
        execute!(
            stderr,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        if newline {
            writeln!(stderr, "{prefix} {line}").ok();
        } else {
            write!(stderr, "{prefix} {line}").ok();
        }
        stderr.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock(); // Wait for any pending display
            self.display(true);
        }
        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        // Clear the line on drop (if not finished properly)
        let mut stderr = stderr().lock();
        execute!(
            stderr,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stderr.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_diagnostics_records_in_order() {
        let diag = CollectDiagnostics::new();
        assert!(diag.is_empty());

        diag.notice("locate", "first");
        diag.notice("atom", "second");

        assert_eq!(
            diag.notices(),
            vec![
                ("locate".to_string(), "first".to_string()),
                ("atom".to_string(), "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_diagnostics_is_shareable() {
        let diag = CollectDiagnostics::new();
        std::thread::scope(|s| {
            for i in 0..4 {
                let diag = &diag;
                s.spawn(move || diag.notice("test", &i.to_string()));
            }
        });
        assert_eq!(diag.notices().len(), 4);
    }

    #[test]
    fn test_progress_line_skips_empty_counters() {
        let progress = ProgressLine::new(&[("documents", 3), ("skipped", 0)]);
        progress.inc("documents");
        progress.inc("unknown");
        assert_eq!(progress.line(), "documents(1/3)");
        drop(progress);
    }
}
