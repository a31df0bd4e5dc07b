use std::fs::OpenOptions;
use std::io::Write;

use super::{Output, OutputContext};
use crate::error::Result;

/// Appends events to the active log file.
///
/// The file is opened, appended to and closed on every write; no handle is
/// kept between events, so a rotation can compress the file at any time.
#[derive(Debug, Default)]
pub struct LogOutput;

impl LogOutput {
  pub fn new() -> Self {
    Self
  }
}

impl Output for LogOutput {
  fn write(&mut self, ctx: &mut OutputContext, event: &str) -> Result<()> {
    let path = ctx.log_files.ensure_active()?;
    let mut file = OpenOptions::new().append(true).open(path)?;
    if event.ends_with('\n') {
      file.write_all(event.as_bytes())?;
    } else {
      let mut line = String::with_capacity(event.len() + 1);
      line.push_str(event);
      line.push('\n');
      file.write_all(line.as_bytes())?;
    }
    Ok(())
  }
}
