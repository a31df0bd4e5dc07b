//! # Outputs
//!
//! Sinks that receive every processed event. The delivery worker fans each
//! event out to all configured outputs in order; a failing or panicking output
//! is reported and skipped, the others still get the event.
//!
//! Outputs run on one thread at a time (the delivery worker, or the thread
//! draining the pipeline after that worker has been joined), so they are only
//! required to be `Send` and may keep plain mutable state.

mod __test__;
mod log;
mod print;
mod socket;

pub use self::log::LogOutput;
pub use print::PrintOutput;
pub use socket::{Endpoint, SocketOutput, DEFAULT_BATCH_BYTES};

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::log_file::LogFileManager;
use crate::registry::{decode, Registry};
use crate::report::Reporter;

/// What an output may touch while writing.
#[derive(Debug)]
pub struct OutputContext {
  pub config: Arc<Config>,
  pub log_files: LogFileManager,
  pub reporter: Reporter,
}

impl OutputContext {
  pub fn new(config: Arc<Config>, reporter: Reporter) -> Result<Self> {
    let log_files = LogFileManager::new(&config.log_file, &config.log_rotate)?;
    Ok(Self {
      config,
      log_files,
      reporter,
    })
  }
}

/// A single sink.
pub trait Output: Send {
  /// Deliver one processed, newline-terminated event.
  fn write(&mut self, ctx: &mut OutputContext, event: &str) -> Result<()>;

  /// Push out anything held back. Called once while the pipeline stops.
  fn flush(&mut self, _ctx: &mut OutputContext) -> Result<()> {
    Ok(())
  }
}

pub type OutputRegistry = Registry<Box<dyn Output>>;

impl Registry<Box<dyn Output>> {
  /// Registry pre-populated with every built-in sink.
  pub fn builtin() -> Self {
    let mut registry = Self::empty();
    registry.register("PrintOutput", |_| Ok(Box::new(PrintOutput::new()) as Box<dyn Output>));
    registry.register("LogOutput", |_| Ok(Box::new(LogOutput::new()) as Box<dyn Output>));
    registry.register("SocketOutput", |params| {
      let params: socket::Params = decode("SocketOutput", params)?;
      Ok(Box::new(SocketOutput::from_params(params)) as Box<dyn Output>)
    });
    registry
  }
}
