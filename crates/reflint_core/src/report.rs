//! Report sink: accumulates the validation transcript.
//!
//! Every line is mirrored to stdout (colorized when enabled) and stored in
//! plain form for optional persistence. Rendering mode is chosen once at
//! construction; nothing global.

use std::fs;
use std::io;
use std::path::Path;

const RULE_WIDTH: usize = 80;

const CYAN: &str = "\u{1b}[96m";
const GREEN: &str = "\u{1b}[92m";
const YELLOW: &str = "\u{1b}[93m";
const RED: &str = "\u{1b}[91m";
const BOLD: &str = "\u{1b}[1m";
const RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Cyan,
    Green,
    Yellow,
    Red,
    Bold,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Plain => "",
            Style::Cyan => CYAN,
            Style::Green => GREEN,
            Style::Yellow => YELLOW,
            Style::Red => RED,
            Style::Bold => BOLD,
        }
    }
}

/// Accumulating report with a running issue count.
#[derive(Debug, Default)]
pub struct Report {
    colorize: bool,
    lines: Vec<String>,
    issues: usize,
}

impl Report {
    pub fn new(colorize: bool) -> Self {
        Self {
            colorize,
            lines: Vec::new(),
            issues: 0,
        }
    }

    /// Total issues recorded so far.
    pub fn issues(&self) -> usize {
        self.issues
    }

    /// The plain-text transcript accumulated so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn emit(&mut self, text: &str, style: Style) {
        if self.colorize && style != Style::Plain {
            println!("{}{}{}", style.code(), text, RESET);
        } else {
            println!("{text}");
        }
        self.lines.push(text.to_string());
    }

    /// Banner header opening a validator run.
    pub fn header(&mut self, title: &str, root: &Path, staged: bool, output: Option<&Path>) {
        self.emit("", Style::Plain);
        self.emit(&"#".repeat(RULE_WIDTH), Style::Plain);
        self.emit(title, Style::Bold);
        self.emit(&"#".repeat(RULE_WIDTH), Style::Plain);
        self.emit(&format!("Mod path: {}", root.display()), Style::Plain);
        if staged {
            self.emit("Mode: Git staged files only", Style::Cyan);
        }
        if let Some(path) = output {
            self.emit(&format!("Output file: {}", path.display()), Style::Plain);
        }
    }

    /// Opens a check section.
    pub fn section(&mut self, title: &str) {
        self.emit("", Style::Plain);
        self.emit(&"=".repeat(RULE_WIDTH), Style::Plain);
        self.emit(title, Style::Cyan);
        self.emit(&"=".repeat(RULE_WIDTH), Style::Plain);
    }

    /// Red headline introducing a non-empty defect list.
    pub fn headline(&mut self, message: &str) {
        self.emit(message, Style::Red);
    }

    /// Yellow advisory accompanying a headline.
    pub fn caution(&mut self, message: &str) {
        self.emit(message, Style::Yellow);
    }

    /// One located defect. `location` is `file` or `file:line`.
    pub fn defect(&mut self, location: &str, symbol: &str) {
        if self.colorize {
            println!("  {YELLOW}{location}{RESET} - {symbol}");
        } else {
            println!("  {location} - {symbol}");
        }
        self.lines.push(format!("  {location} - {symbol}"));
    }

    /// Closes a failing check and bumps the running total.
    pub fn issue_count(&mut self, count: usize) {
        self.emit(&format!("{count} issues found"), Style::Red);
        self.issues += count;
    }

    /// Green all-clear line for a check.
    pub fn clean(&mut self, what: &str) {
        self.emit(&format!("✓ No issues found with {what}"), Style::Green);
    }

    /// Final banner with the run's verdict.
    pub fn summary(&mut self) {
        self.emit("", Style::Plain);
        self.emit(&"#".repeat(RULE_WIDTH), Style::Plain);
        if self.issues == 0 {
            self.emit("✓ VALIDATION COMPLETE - NO ISSUES FOUND", Style::Green);
        } else {
            self.emit(
                &format!("✗ VALIDATION COMPLETE - {} TOTAL ISSUES FOUND", self.issues),
                Style::Red,
            );
        }
        self.emit(&"#".repeat(RULE_WIDTH), Style::Plain);
        self.emit("", Style::Plain);
    }

    /// Writes the plain transcript to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.lines.join("\n"))
    }
}
