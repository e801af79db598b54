// logging.rs
// Timestamped console logging shared by the operator client and the stub server

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS - LEVEL - message`
pub fn format_line(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} - {} - {}", timestamp, level.as_str(), message)
}

/// Errors go to stderr, everything else to stdout.
pub fn log_message(level: LogLevel, message: &str) {
    match level {
        LogLevel::Error => eprintln!("{}", format_line(level, message)),
        _ => println!("{}", format_line(level, message)),
    }
}

pub fn log_info(message: &str) {
    log_message(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_message(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_message(LogLevel::Error, message);
}
