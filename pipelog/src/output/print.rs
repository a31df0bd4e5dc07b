use std::io::{self, Write};

use super::{Output, OutputContext};
use crate::error::Result;

/// Writes events to standard output.
#[derive(Debug, Default)]
pub struct PrintOutput;

impl PrintOutput {
  pub fn new() -> Self {
    Self
  }
}

impl Output for PrintOutput {
  fn write(&mut self, _ctx: &mut OutputContext, event: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(event.as_bytes())?;
    if !event.ends_with('\n') {
      stdout.write_all(b"\n")?;
    }
    Ok(())
  }

  fn flush(&mut self, _ctx: &mut OutputContext) -> Result<()> {
    io::stdout().flush()?;
    Ok(())
  }
}
