//! Pipeline configuration.
//!
//! The pipeline never reads configuration files itself. These types derive
//! `Deserialize` so whatever loads the application's settings can produce a
//! [`Config`]; after [`Pipeline::start`](crate::pipeline::Pipeline::start) it is
//! shared read-only behind an `Arc`.

mod __test__;

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::Error;
use crate::event::DEFAULT_TIME_FORMAT;
use crate::formatter::EventFormat;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  pub event: EventConfig,
  pub log_file: LogFileConfig,
  pub log_rotate: LogRotateConfig,
  pub internal_events: InternalEventsConfig,
  pub processors: Vec<PluginEntry>,
  pub outputs: Vec<PluginEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventConfig {
  pub format: EventFormat,
  pub debug_mode: bool,
  pub info_mode: bool,
  /// chrono `strftime` pattern for the `time` field
  pub time_format: String,
}

impl Default for EventConfig {
  fn default() -> Self {
    Self {
      format: EventFormat::Default,
      debug_mode: false,
      info_mode: true,
      time_format: DEFAULT_TIME_FORMAT.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogFileConfig {
  /// Directory holding the active and rotated files
  pub path: PathBuf,
  pub name: String,
  /// Including the leading dot, e.g. `.log`
  pub extension: String,
}

impl Default for LogFileConfig {
  fn default() -> Self {
    Self {
      path: PathBuf::from("./logs"),
      name: "application".to_string(),
      extension: ".log".to_string(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
  #[default]
  Gzip,
  Zip,
}

impl CompressionFormat {
  /// Extension that replaces the rotated file's own.
  pub fn extension(&self) -> &'static str {
    match self {
      CompressionFormat::Gzip => ".gz",
      CompressionFormat::Zip => ".zip",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRotateConfig {
  #[serde(rename = "maxSizeInKB")]
  pub max_size_kb: u64,
  #[serde(rename = "rotationPeriodInSeconds")]
  pub rotation_period_seconds: u64,
  pub compression_format: CompressionFormat,
  /// How often the delivery worker evaluates rotation while running
  pub check_interval_millis: u64,
}

impl Default for LogRotateConfig {
  fn default() -> Self {
    Self {
      max_size_kb: 10 * 1024,
      rotation_period_seconds: 24 * 60 * 60,
      compression_format: CompressionFormat::Gzip,
      check_interval_millis: 1000,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InternalEventsConfig {
  pub enabled: bool,
  pub path: PathBuf,
  pub name: String,
  pub extension: String,
}

impl Default for InternalEventsConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      path: PathBuf::from("./logs/internal"),
      name: "pipelog-internal".to_string(),
      extension: ".log".to_string(),
    }
  }
}

/// One `{name, parameters}` entry of the `processors` or `outputs` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginEntry {
  pub name: String,
  #[serde(default)]
  pub parameters: Value,
}

impl PluginEntry {
  pub fn new(name: impl Into<String>, parameters: Value) -> Self {
    Self {
      name: name.into(),
      parameters,
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      event: EventConfig::default(),
      log_file: LogFileConfig::default(),
      log_rotate: LogRotateConfig::default(),
      internal_events: InternalEventsConfig::default(),
      processors: Vec::new(),
      outputs: vec![PluginEntry::new("LogOutput", Value::Null)],
    }
  }
}

impl Config {
  /// Basic sanity checks; the pipeline still starts on an invalid config, this
  /// is for loaders that want to reject it up front.
  pub fn validate(&self) -> crate::Result<()> {
    if self.log_file.name.is_empty() {
      return Err(Error::InvalidConfig("logFile.name must not be empty".to_string()));
    }
    if self.log_rotate.max_size_kb == 0 {
      return Err(Error::InvalidConfig("logRotate.maxSizeInKB must be greater than 0".to_string()));
    }
    if self.log_rotate.rotation_period_seconds == 0 {
      return Err(Error::InvalidConfig("logRotate.rotationPeriodInSeconds must be greater than 0".to_string()));
    }
    Ok(())
  }

  /// Config of the self-diagnostic pipeline derived from `internalEvents`.
  ///
  /// Default format, every level enabled, a single file output, and no
  /// internal pipeline of its own.
  pub fn internal(&self) -> Config {
    Config {
      event: EventConfig {
        format: EventFormat::Default,
        debug_mode: true,
        info_mode: true,
        time_format: self.event.time_format.clone(),
      },
      log_file: LogFileConfig {
        path: self.internal_events.path.clone(),
        name: self.internal_events.name.clone(),
        extension: self.internal_events.extension.clone(),
      },
      log_rotate: self.log_rotate.clone(),
      internal_events: InternalEventsConfig {
        enabled: false,
        ..self.internal_events.clone()
      },
      processors: Vec::new(),
      outputs: vec![PluginEntry::new("LogOutput", Value::Null)],
    }
  }
}
