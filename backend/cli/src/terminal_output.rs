//! Terminal output: themed ANSI palette, notes, and the result-area view.

use std::io::Write;
use std::sync::Mutex;

use narrate_config::Theme;
use narrate_core::{NarrationResult, NarrationView, UiState};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const ITALIC: &str = "\x1b[3m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI: parameters, then one final byte in '@'..='~'
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) { break; }
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Server-supplied text rendered as plain text: no escapes, no control chars.
pub fn plain_text(s: &str) -> String {
    strip_ansi(s)
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

// ---------------------------------------------------------------------------
// Theme palette
// ---------------------------------------------------------------------------

/// Colors for one theme. Empty strings when color is off.
#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub success: &'static str,
    pub warn: &'static str,
    pub error: &'static str,
    pub muted: &'static str,
    pub bold: &'static str,
    pub italic: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme, color: bool) -> Self {
        if !color {
            return Self::plain();
        }
        match theme {
            // Bright variants read well on dark backgrounds.
            Theme::Dark => Self {
                accent: "\x1b[96m",
                success: "\x1b[92m",
                warn: "\x1b[93m",
                error: "\x1b[91m",
                muted: "\x1b[90m",
                bold: BOLD,
                italic: ITALIC,
                reset: RESET,
            },
            Theme::Light => Self {
                accent: "\x1b[34m",
                success: "\x1b[32m",
                warn: "\x1b[33m",
                error: "\x1b[31m",
                muted: DIM,
                bold: BOLD,
                italic: ITALIC,
                reset: RESET,
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            accent: "",
            success: "",
            warn: "",
            error: "",
            muted: "",
            bold: "",
            italic: "",
            reset: "",
        }
    }

    pub fn is_plain(&self) -> bool {
        self.reset.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

/// Print a formatted INFO note to stdout.
pub fn note_info(palette: &Palette, msg: &str) {
    if palette.is_plain() {
        println!("INFO: {msg}");
    } else {
        println!("{}{}ℹ{} {msg}", palette.accent, palette.bold, palette.reset);
    }
}

/// Print a formatted WARNING note to stderr.
pub fn note_warn(palette: &Palette, msg: &str) {
    if palette.is_plain() {
        eprintln!("WARN: {msg}");
    } else {
        eprintln!("{}{}⚠{} {msg}", palette.warn, palette.bold, palette.reset);
    }
}

/// Print a formatted ERROR note to stderr.
pub fn note_error(palette: &Palette, msg: &str) {
    if palette.is_plain() {
        eprintln!("ERROR: {msg}");
    } else {
        eprintln!("{}{}✗{} {msg}", palette.error, palette.bold, palette.reset);
    }
}

// ---------------------------------------------------------------------------
// Result-area view
// ---------------------------------------------------------------------------

/// Renders workflow updates as lines on a writer (stdout in practice).
///
/// Terminal output is append-only, so clearing the previous result is a
/// no-op; each invocation starts with its file name line instead.
pub struct TerminalView<W: Write + Send> {
    out: Mutex<W>,
    palette: Palette,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out: Mutex::new(out),
            palette,
        }
    }

    fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> NarrationView for TerminalView<W> {
    fn show_file_name(&self, name: &str) {
        let p = &self.palette;
        self.line(&format!("{}{}{}{}", p.accent, p.bold, plain_text(name), p.reset));
    }

    fn clear_result(&self) {}

    fn set_state(&self, state: UiState) {
        if state == UiState::Pending {
            let p = &self.palette;
            self.line(&format!("{}{}Analyzing...{}", p.muted, p.italic, p.reset));
        }
    }

    fn show_result(&self, result: &NarrationResult) {
        let p = &self.palette;
        let text = plain_text(result.text());
        match result {
            NarrationResult::Caption(_) => self.line(&format!("{}{text}{}", p.success, p.reset)),
            NarrationResult::Failure(_) => self.line(&format!("{}{text}{}", p.error, p.reset)),
        }
    }
}
