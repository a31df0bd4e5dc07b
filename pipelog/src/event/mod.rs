
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::panic::Location;

/// Pattern used when the configured time format cannot be rendered.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Severity of an event, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
  Fatal,
  Error,
  Warning,
  Info,
  Debug,
}

impl Level {
  #[inline]
  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Fatal => "FATAL",
      Level::Error => "ERROR",
      Level::Warning => "WARNING",
      Level::Info => "INFO",
      Level::Debug => "DEBUG",
    }
  }

  /// Whether an event of this level is accepted under the given modes.
  ///
  /// FATAL, ERROR and WARNING are unconditional. INFO needs either mode,
  /// DEBUG needs debug mode.
  pub fn is_enabled(&self, info_mode: bool, debug_mode: bool) -> bool {
    match self {
      Level::Fatal | Level::Error | Level::Warning => true,
      Level::Info => info_mode || debug_mode,
      Level::Debug => debug_mode,
    }
  }
}

impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where a log call was made.
///
/// `class` and `method` are whatever the call site could name: the macros fill
/// in the module path and enclosing function, `#[track_caller]` entry points
/// fill in the source file and `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
  pub class: &'static str,
  pub method: &'static str,
  pub line: u32,
}

impl CallSite {
  pub const fn new(class: &'static str, method: &'static str, line: u32) -> Self {
    Self {
      class,
      method,
      line,
    }
  }

  /// Call site of whoever called the enclosing `#[track_caller]` function.
  #[track_caller]
  pub fn caller() -> Self {
    let location = Location::caller();
    Self {
      class: location.file(),
      method: "-",
      line: location.line(),
    }
  }
}

/// Metadata captured synchronously on the producer thread.
///
/// Building this before enqueueing is what keeps timestamps and call sites
/// accurate; the workers never look at the clock for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMetadata {
  pub time: String,
  pub level: Level,
  pub class: String,
  pub method: String,
  pub line: u32,
}

impl EventMetadata {
  pub fn new(
    time: impl Into<String>,
    level: Level,
    class: impl Into<String>,
    method: impl Into<String>,
    line: u32,
  ) -> Self {
    Self {
      time: time.into(),
      level,
      class: class.into(),
      method: method.into(),
      line,
    }
  }

  /// Capture metadata for an event happening now.
  pub fn capture(level: Level, site: CallSite, time_format: &str) -> Self {
    Self {
      time: format_now(time_format),
      level,
      class: site.class.to_string(),
      method: site.method.to_string(),
      line: site.line,
    }
  }

  /// Metadata as ordered `(name, value)` pairs, the order every wire form uses.
  pub fn fields(&self) -> [(&'static str, String); 5] {
    [
      ("time", self.time.clone()),
      ("level", self.level.as_str().to_string()),
      ("class", self.class.clone()),
      ("method", self.method.clone()),
      ("line", self.line.to_string()),
    ]
  }
}

/// Render the local time with a chrono pattern.
///
/// An invalid pattern makes chrono's `Display` fail; fall back to
/// [`DEFAULT_TIME_FORMAT`] instead of panicking.
pub fn format_now(time_format: &str) -> String {
  let now = Local::now();
  let mut out = String::with_capacity(32);
  if write!(out, "{}", now.format(time_format)).is_err() {
    out.clear();
    let _ = write!(out, "{}", now.format(DEFAULT_TIME_FORMAT));
  }
  out
}

/// What the application logs: a message or an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogPayload {
  Message(String),
  Fields(Vec<(String, String)>),
}

impl LogPayload {
  /// Reduce an error to its message text.
  pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
    LogPayload::Message(error.to_string())
  }

  pub fn fields<K, V, I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    LogPayload::Fields(
      pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

impl From<&str> for LogPayload {
  fn from(message: &str) -> Self {
    LogPayload::Message(message.to_string())
  }
}

impl From<String> for LogPayload {
  fn from(message: String) -> Self {
    LogPayload::Message(message)
  }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for LogPayload {
  fn from(pairs: Vec<(K, V)>) -> Self {
    LogPayload::fields(pairs)
  }
}
