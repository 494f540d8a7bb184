use chrono::Local;
use std::fmt;

pub fn info(args: fmt::Arguments) {
    let now = Local::now();
    println!("[{}] INFO {}", now.format("%Y-%m-%d %H:%M:%S"), args);
}

pub fn warn(args: fmt::Arguments) {
    let now = Local::now();
    println!("[{}] WARN {}", now.format("%Y-%m-%d %H:%M:%S"), args);
}

/// Debug lines are opt-in via the `STAGEMAP_DEBUG` env var; collation soft
/// misses log here and nowhere else.
pub fn debug(args: fmt::Arguments) {
    if std::env::var_os("STAGEMAP_DEBUG").is_some() {
        let now = Local::now();
        println!("[{}] DEBUG {}", now.format("%Y-%m-%d %H:%M:%S"), args);
    }
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::info(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::warn(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logger::debug(format_args!($($arg)*))
    };
}
