use std::io;
use std::path::PathBuf;

/// Errors produced while building or running a pipeline.
///
/// Nothing in the runtime path returns these to the application: workers catch
/// them where they happen and hand them to the [`Reporter`](crate::report::Reporter).
/// Constructors (plugin factories, compression, file creation) return them so
/// the caller can decide to skip the failing piece.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("unknown plugin `{0}`")]
  UnknownPlugin(String),

  #[error("invalid parameters for `{plugin}`: {source}")]
  InvalidParameters {
    plugin: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("invalid CIDR range `{0}`")]
  InvalidCidr(String),

  #[error("invalid pattern: {0}")]
  Regex(#[from] regex::Error),

  #[error("socket endpoint {endpoint}: {source}")]
  Socket {
    endpoint: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to compress {}: {source}", path.display())]
  Compression {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
