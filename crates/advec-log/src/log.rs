use std::{
    io::Write,
    sync::{Mutex, OnceLock, PoisonError},
};

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

mod error;
mod filters;
pub mod fmt;

pub use error::LogError;
pub use filters::Filters;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec, SegmentSpec};

use crate::Result;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {

    pub const ALL: [Level; 5] = [
        Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| s.eq_ignore_ascii_case(level.as_str()))
            .ok_or(())
    }
}

impl core::fmt::Display for Level {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Logger {
    stderr: StandardStream,
    fmts: [LogFmt; 5],
    filters: Filters,
}

impl Logger {

    fn new(filters: Filters) -> Self {
        Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            fmts: Level::ALL.map(LogFmt::for_level),
            filters,
        }
    }

    fn log(&mut self, target: &str, level: Level, msg: core::fmt::Arguments) -> Result<bool> {
        if !self.filters.enabled(target, level) {
            return Ok(false)
        }
        let fmt = &self.fmts[level as usize];
        let mut out = self.stderr.lock();
        fmt.render(&mut out, msg)?;
        out.flush()?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

#[inline(always)]
fn with_logger<R>(f: impl FnOnce(&mut Logger) -> R) -> Option<R> {
    let logger = LOGGER.get()?;
    let mut guard = logger.lock().unwrap_or_else(PoisonError::into_inner);
    Some(f(&mut guard))
}

/// Initializes the global logger with filters read from `RUST_LOG`.
///
/// Calling this more than once keeps the first logger.
pub fn init() {
    init_with(Filters::from_env());
}

pub fn init_with(filters: Filters) {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(filters)));
}

#[inline(always)]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Rebuilds the output format of `level`.
///
/// Returns false if the logger has not been initialized.
pub fn set_fmt(level: Level, f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    with_logger(|logger| {
        let mut builder = LogFmtBuilder::new(&mut logger.fmts[level as usize]);
        f(&mut builder);
    }).is_some()
}

#[inline(always)]
pub fn enabled(target: &str, level: Level) -> bool {
    with_logger(|logger| logger.filters.enabled(target, level))
        .unwrap_or(false)
}

/// Writes one record. Records logged before [`init`] are dropped and report `Ok(false)`.
#[inline(always)]
pub fn log(target: &str, level: Level, args: core::fmt::Arguments) -> Result<bool> {
    with_logger(|logger| logger.log(target, level, args))
        .unwrap_or(Ok(false))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
