//! Logging utilities with colored output.
//!
//! Provides the `log!` macro for formatted terminal output with a colored
//! `[module]` prefix. Every pass logs one line per notable per-file event
//! and a single summary line at the end of the run.
//!
//! # Example
//!
//! ```ignore
//! log!("canonical"; "{} -> {}", rel, url);
//! log!("sitemap"; "done. urls: {}", count);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name plus trailing space: "[module] "
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + 3
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
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

/// Log a message with a colored module prefix.
///
/// Automatically truncates long single-line messages to fit terminal width.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();

    if message.contains('\n') {
        // Multiline messages (e.g. error details) are printed untruncated.
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let prefix_len = calc_prefix_len(module.len());
        let max_msg_len = width.saturating_sub(prefix_len);

        let message = if message.len() > max_msg_len {
            truncate_str(message, max_msg_len)
        } else {
            message
        };

        writeln!(stdout, "{prefix} {message}").ok();
    }

    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module {
        "canonical" => prefix.bright_blue().bold(),
        "track" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len() {
        // "sitemap" -> "[sitemap] " = 7 + 2 + 1 = 10
        assert_eq!(calc_prefix_len(7), 10);
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "€" is 3 bytes; truncating at byte 4 must back up to a boundary
        assert_eq!(truncate_str("€€", 4), "€");
        assert_eq!(truncate_str("€€", 6), "€€");
        assert_eq!(truncate_str("a€b", 3), "a");
    }
}
