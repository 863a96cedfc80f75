//! Leveled diagnostic output.
//!
//! Components that emit diagnostics take a `&dyn Reporter` instead of
//! consulting process-wide state. Verbosity lives on the reporter.
//!
//! # Example
//!
//! ```
//! use img2gd::report::{ConsoleReporter, Reporter};
//!
//! let reporter = ConsoleReporter::with_output(Vec::new()).with_verbose(true);
//! reporter.info("Drawn pixels: 42");
//! reporter.debug("only shown when verbose");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::timestamp::file_timestamp;

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Fatal,
}

impl Level {
    pub fn prefix(self) -> &'static str {
        match self {
            Level::Debug => "[DEBUG]",
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Fatal => "[FATAL]",
        }
    }
}

/// Sink for leveled diagnostics.
pub trait Reporter: Send + Sync {
    /// Emit one line at the given level.
    fn log(&self, level: Level, message: &str);

    /// Whether debug lines are emitted.
    fn is_verbose(&self) -> bool {
        false
    }

    fn debug(&self, message: &str) {
        if self.is_verbose() {
            self.log(Level::Debug, message);
        }
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }
}

/// A reporter that discards everything.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn log(&self, _level: Level, _message: &str) {}
}

/// A reporter that keeps lines in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    verbose: bool,
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true, lines: Mutex::new(Vec::new()) }
    }

    /// All captured lines, prefixed like console output.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().map(|(l, m)| format!("{} {}", l.prefix(), m)).collect())
            .unwrap_or_default()
    }

    /// Whether any captured line at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines
            .lock()
            .map(|lines| lines.iter().any(|(l, m)| *l == level && m.contains(needle)))
            .unwrap_or(false)
    }
}

impl Reporter for MemoryReporter {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Console reporter with optional colors and an optional log file mirror.
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to emit debug lines
    verbose: bool,
    /// Output writer (stderr unless overridden for tests)
    output: Mutex<Box<dyn Write + Send>>,
    /// Uncolored copy of every line
    log_file: Option<Mutex<File>>,
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("log_file", &self.log_file.is_some())
            .finish()
    }
}

impl ConsoleReporter {
    /// Create a reporter writing to stderr, colored when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            output: Mutex::new(Box::new(std::io::stderr())),
            log_file: None,
        }
    }

    /// Create a reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            output: Mutex::new(Box::new(output)),
            log_file: None,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Mirror every line into `<dir>/<timestamp>.log`, creating `dir` if needed.
    ///
    /// Returns the path of the log file.
    pub fn with_log_dir(mut self, dir: &Path) -> std::io::Result<(Self, PathBuf)> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", file_timestamp()));
        let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        self.log_file = Some(Mutex::new(file));
        Ok((self, path))
    }

    fn color_code(level: Level) -> Option<&'static str> {
        match level {
            Level::Debug => Some("\x1b[90m"),
            Level::Info => None,
            Level::Warn => Some("\x1b[33m"),
            Level::Fatal => Some("\x1b[31m"),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn log(&self, level: Level, message: &str) {
        if level == Level::Debug && !self.verbose {
            return;
        }

        let line = format!("{} {}", level.prefix(), message);
        let shown = match Self::color_code(level) {
            Some(code) if self.use_colors => format!("{}{}\x1b[0m", code, line),
            _ => line.clone(),
        };

        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", shown);
        }
        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}
