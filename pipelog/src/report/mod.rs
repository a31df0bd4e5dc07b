//! Self-diagnostics.
//!
//! Failures inside the pipeline (a sink that cannot write, a rotation that
//! cannot compress, a plugin entry that cannot be built) never reach the
//! application. They are handed to a [`Reporter`], which logs them into the
//! internal-events pipeline when one is configured and falls back to
//! `tracing` otherwise.

use std::sync::Arc;

use crate::event::{CallSite, Level};
use crate::pipeline::Pipeline;

#[derive(Clone, Default)]
pub struct Reporter {
  internal: Option<Arc<Pipeline>>,
}

impl Reporter {
  /// Reporter that only emits through `tracing`.
  pub fn tracing_only() -> Self {
    Self::default()
  }

  /// Reporter that forwards into a running internal pipeline.
  pub fn with_pipeline(internal: Arc<Pipeline>) -> Self {
    Self {
      internal: Some(internal),
    }
  }

  pub fn has_pipeline(&self) -> bool {
    self.internal.is_some()
  }

  /// Report an internal failure or notice.
  #[track_caller]
  pub fn report(&self, level: Level, message: impl Into<String>) {
    let message = message.into();
    let site = CallSite::caller();

    if let Some(internal) = &self.internal {
      if internal.log(level, message.as_str(), site) {
        return;
      }
    }

    match level {
      Level::Fatal | Level::Error => {
        tracing::error!(file = site.class, line = site.line, "[pipelog] {}", message)
      },
      Level::Warning => tracing::warn!(file = site.class, line = site.line, "[pipelog] {}", message),
      Level::Info => tracing::info!(file = site.class, line = site.line, "[pipelog] {}", message),
      Level::Debug => tracing::debug!(file = site.class, line = site.line, "[pipelog] {}", message),
    }
  }

  /// Stop the internal pipeline, draining whatever it still holds.
  pub(crate) fn shutdown(&self) {
    if let Some(internal) = &self.internal {
      internal.stop();
    }
  }
}

impl std::fmt::Debug for Reporter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Reporter")
      .field("internal", &self.internal.is_some())
      .finish()
  }
}
