//! # Log file lifecycle
//!
//! Files are named `{name}-{timestamp}{extension}`, with the timestamp fixed
//! when the active name is computed:
//!
//! ```text
//! logs/application-2024-05-01-10-00-00-000.log   <- active
//! logs/application-2024-04-30-09-12-44-117.gz    <- rotated
//! ```
//!
//! A rotation check walks the directory, and every file matching
//! `{name}-<digits and dashes>{extension}` that is older than the rotation
//! period or larger than the size limit is compressed and removed. When the
//! active file is one of them, a fresh active name is computed right away.
//!
//! The manager is owned by the delivery side of the pipeline, so the active
//! name is only ever changed from one thread at a time.


use chrono::{DateTime, Local, NaiveDate, TimeZone};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::compression;
use crate::config::{LogFileConfig, LogRotateConfig};
use crate::error::{Error, Result};

/// chrono pattern of the timestamp embedded in file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// What a rotation check did.
#[derive(Debug, Default)]
pub struct RotationOutcome {
  /// Paths of the archives that replaced rotated files
  pub rotated: Vec<PathBuf>,
  pub errors: Vec<Error>,
}

impl RotationOutcome {
  pub fn is_empty(&self) -> bool {
    self.rotated.is_empty() && self.errors.is_empty()
  }
}

#[derive(Debug)]
pub struct LogFileManager {
  dir: PathBuf,
  name: String,
  extension: String,
  rotate: LogRotateConfig,
  active: PathBuf,
  pattern: Regex,
}

impl LogFileManager {
  pub fn new(file: &LogFileConfig, rotate: &LogRotateConfig) -> Result<Self> {
    let pattern = Regex::new(&format!(
      r"^{}-([0-9-]+){}$",
      regex::escape(&file.name),
      regex::escape(&file.extension)
    ))?;
    let mut manager = Self {
      dir: file.path.clone(),
      name: file.name.clone(),
      extension: file.extension.clone(),
      rotate: rotate.clone(),
      active: PathBuf::new(),
      pattern,
    };
    manager.regenerate();
    Ok(manager)
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// File name for a file created at `at`.
  pub fn file_name_at(&self, at: DateTime<Local>) -> String {
    format!("{}-{}{}", self.name, at.format(FILE_TIMESTAMP_FORMAT), self.extension)
  }

  pub fn active_path(&self) -> &Path {
    &self.active
  }

  /// Compute a new active name stamped with the current time.
  pub fn regenerate(&mut self) -> &Path {
    self.active = self.dir.join(self.file_name_at(Local::now()));
    &self.active
  }

  pub fn exists(&self) -> bool {
    self.active.is_file()
  }

  /// Create the directory and the active file. A no-op when it already exists.
  pub fn create(&self) -> Result<()> {
    if self.exists() {
      return Ok(());
    }
    fs::create_dir_all(&self.dir)?;
    OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.active)?;
    Ok(())
  }

  /// Active path, created if needed.
  pub fn ensure_active(&self) -> Result<&Path> {
    self.create()?;
    Ok(&self.active)
  }

  /// Files in the directory that belong to this log, oldest name first.
  ///
  /// A directory that does not exist yet simply has no candidates.
  pub fn candidates(&self) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };

    let mut found = Vec::new();
    for entry in entries {
      let entry = entry?;
      let file_name = entry.file_name();
      let Some(file_name) = file_name.to_str() else {
        continue;
      };
      if self.pattern.is_match(file_name) && entry.file_type()?.is_file() {
        found.push(entry.path());
      }
    }
    found.sort();
    Ok(found)
  }

  /// When `path` was created: the timestamp in its name, or its mtime when
  /// the name carries none.
  pub fn created_at(&self, path: &Path) -> Option<SystemTime> {
    let from_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .and_then(|name| self.pattern.captures(name))
      .and_then(|caps| caps.get(1))
      .and_then(|stamp| parse_file_timestamp(stamp.as_str()));

    from_name.or_else(|| fs::metadata(path).and_then(|m| m.modified()).ok())
  }

  /// Whether `path` is past the age or size limit.
  ///
  /// Age is strictly greater than the rotation period. Size is the file's own
  /// length in whole KiB, strictly greater than `maxSizeInKB`.
  pub fn should_rotate(&self, path: &Path, now: SystemTime) -> Result<bool> {
    let period = Duration::from_secs(self.rotate.rotation_period_seconds);
    if let Some(created) = self.created_at(path) {
      if let Ok(age) = now.duration_since(created) {
        if age > period {
          return Ok(true);
        }
      }
    }

    let size_kb = fs::metadata(path)?.len() / 1024;
    Ok(size_kb > self.rotate.max_size_kb)
  }

  /// Evaluate every candidate and rotate the ones that are due.
  ///
  /// Failures are collected per file; one bad file does not stop the rest.
  pub fn rotate_due(&mut self) -> RotationOutcome {
    let mut outcome = RotationOutcome::default();
    let candidates = match self.candidates() {
      Ok(candidates) => candidates,
      Err(e) => {
        outcome.errors.push(e);
        return outcome;
      },
    };

    let now = SystemTime::now();
    let mut active_rotated = false;
    for path in candidates {
      match self.should_rotate(&path, now) {
        Ok(true) => {},
        Ok(false) => continue,
        Err(e) => {
          outcome.errors.push(e);
          continue;
        },
      }

      match compression::compress(&path, self.rotate.compression_format) {
        Ok(archive) => {
          tracing::debug!(from = %path.display(), to = %archive.display(), "rotated log file");
          active_rotated |= path == self.active;
          outcome.rotated.push(archive);
        },
        Err(e) => outcome.errors.push(e),
      }
    }

    if active_rotated {
      self.regenerate();
    }
    outcome
  }
}

/// Parse the `YYYY-MM-DD-HH-MM-SS[-mmm]` part of a file name as local time.
pub fn parse_file_timestamp(stamp: &str) -> Option<SystemTime> {
  let parts: Vec<u32> = stamp
    .split('-')
    .map(|part| part.parse::<u32>().ok())
    .collect::<Option<_>>()?;
  if parts.len() != 6 && parts.len() != 7 {
    return None;
  }
  let millis = parts.get(6).copied().unwrap_or(0);
  let naive = NaiveDate::from_ymd_opt(parts[0] as i32, parts[1], parts[2])?
    .and_hms_milli_opt(parts[3], parts[4], parts[5], millis)?;
  let local = Local.from_local_datetime(&naive).earliest()?;
  Some(SystemTime::from(local))
}
