//! Compression of rotated log files.
//!
//! [`compress`] turns `dir/app-2024-05-01-10-00-00-000.log` into
//! `dir/app-2024-05-01-10-00-00-000.gz` (or `.zip`) and removes the original.
//! The archive is written to a `.tmp` sibling, synced and renamed into place,
//! so a crash never leaves a half-written archive under the final name. The
//! original is only removed once the archive is durable.
//!
//! Zip archives hold a single deflated entry named after the original file,
//! stamped with the local time of compression.


use chrono::{Datelike, Local, Timelike};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::CompressionFormat;
use crate::error::{Error, Result};

/// Path the compressed form of `path` is written to.
pub fn target_path(path: &Path, format: CompressionFormat) -> PathBuf {
  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!("{}{}", stem, format.extension()))
}

/// Compress `path`, remove it, and return the archive's path.
pub fn compress(path: &Path, format: CompressionFormat) -> Result<PathBuf> {
  let target = target_path(path, format);
  let tmp = target.with_file_name(format!(
    "{}.tmp",
    target
      .file_name()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_default()
  ));

  let written = match format {
    CompressionFormat::Gzip => write_gzip(path, &tmp),
    CompressionFormat::Zip => write_zip(path, &tmp),
  };
  if let Err(source) = written.and_then(|_| fs::rename(&tmp, &target)) {
    let _ = fs::remove_file(&tmp);
    return Err(Error::Compression {
      path: path.to_path_buf(),
      source,
    });
  }

  fs::remove_file(path).map_err(|source| Error::Compression {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(target)
}

fn write_gzip(src: &Path, tmp: &Path) -> io::Result<()> {
  let mut input = BufReader::new(File::open(src)?);
  let mut encoder = GzEncoder::new(BufWriter::new(File::create(tmp)?), Compression::default());
  io::copy(&mut input, &mut encoder)?;
  let writer = encoder.finish()?;
  let file = writer.into_inner().map_err(|e| e.into_error())?;
  file.sync_all()
}

fn write_zip(src: &Path, tmp: &Path) -> io::Result<()> {
  let name = src
    .file_name()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();

  let mut options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .large_file(fs::metadata(src)?.len() > u32::MAX as u64);
  if let Some(modified) = entry_timestamp() {
    options = options.last_modified_time(modified);
  }

  let mut input = BufReader::new(File::open(src)?);
  let mut archive = ZipWriter::new(BufWriter::new(File::create(tmp)?));
  archive.start_file(name, options).map_err(io::Error::other)?;
  io::copy(&mut input, &mut archive)?;
  let writer = archive.finish().map_err(io::Error::other)?;
  let file = writer.into_inner().map_err(|e| e.into_error())?;
  file.sync_all()
}

/// Local time as a zip entry timestamp; `None` outside the DOS date range.
fn entry_timestamp() -> Option<DateTime> {
  let now = Local::now();
  let year = u16::try_from(now.year()).ok()?;
  DateTime::from_date_and_time(
    year,
    now.month() as u8,
    now.day() as u8,
    now.hour() as u8,
    now.minute() as u8,
    now.second() as u8,
  )
  .ok()
}
