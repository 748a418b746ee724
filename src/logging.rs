//! Structured logging for the audit engine
//!
//! Provides context-rich logging tagged with the engine component and,
//! where relevant, the collector being scored. Supports both console output
//! and file-based logging for batch audit runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::RankingEntry;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Stats,
    Digits,
    Correlation,
    Spatial,
    Integrity,
    Config,
    Ingest,
    Report,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Stats => write!(f, "STATS"),
            Component::Digits => write!(f, "DIGITS"),
            Component::Correlation => write!(f, "CORR"),
            Component::Spatial => write!(f, "IDW"),
            Component::Integrity => write!(f, "INTEGRITY"),
            Component::Config => write!(f, "CONFIG"),
            Component::Ingest => write!(f, "INGEST"),
            Component::Report => write!(f, "REPORT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn log(&self, level: LogLevel, component: Component, collector_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(level, component, collector_id, message);
        let collector_part = collector_id.map(|c| format!(" [{}]", c)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, collector_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, collector_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Renders one log line: `<utc time> <LEVEL> <COMPONENT> [collector]: message`.
fn format_entry(level: LogLevel, component: Component, collector_id: Option<&str>, message: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let collector_part = collector_id.map(|c| format!(" [{}]", c)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, component, collector_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger. Until this is called all logging is a no-op.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }
}

fn dispatch(level: LogLevel, component: Component, collector_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, collector_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, collector_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, collector_id, message);
}

/// Log a warning message
pub fn warn(component: Component, collector_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, collector_id, message);
}

/// Log an error message
pub fn error(component: Component, collector_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, collector_id, message);
}

/// Log a debug message
pub fn debug(component: Component, collector_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, collector_id, message);
}

// ---------------------------------------------------------------------------
// Ranking Summary Logging
// ---------------------------------------------------------------------------

/// Level for a ranking summary: Info when nobody is flagged, Error when
/// every collector is, Warning otherwise.
pub fn ranking_summary_level(total: usize, flagged: usize) -> LogLevel {
    if flagged == 0 {
        LogLevel::Info
    } else if flagged == total {
        LogLevel::Error
    } else {
        LogLevel::Warning
    }
}

/// Log a summary of a completed ranking.
pub fn log_ranking_summary(entries: &[RankingEntry]) {
    let flagged = entries.iter().filter(|e| !e.flags.is_empty()).count();
    let message = format!(
        "Ranking complete: {} collector(s), {} flagged",
        entries.len(),
        flagged
    );
    dispatch(
        ranking_summary_level(entries.len(), flagged),
        Component::Integrity,
        None,
        &message,
    );
}
