use serde::Deserialize;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{Output, OutputContext};
use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::event::Level;

pub const DEFAULT_BATCH_BYTES: usize = 4096;
const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
  pub host: String,
  pub port: u16,
}

impl Endpoint {
  pub fn new(host: impl Into<String>, port: u16) -> Self {
    Self {
      host: host.into(),
      port,
    }
  }
}

impl std::fmt::Display for Endpoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.host, self.port)
  }
}

fn default_batch_bytes() -> usize {
  DEFAULT_BATCH_BYTES
}

fn default_connect_timeout() -> u64 {
  DEFAULT_CONNECT_TIMEOUT_MILLIS
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Params {
  pub endpoints: Vec<Endpoint>,
  #[serde(default = "default_batch_bytes")]
  pub batch_size_bytes: usize,
  #[serde(default = "default_connect_timeout")]
  pub connect_timeout_millis: u64,
}

/// Ships batches of events to TCP endpoints.
///
/// Events accumulate in a byte-budgeted [`Batch`]. When the next event does
/// not fit, the pending batch is joined with `\n` and sent to every endpoint
/// over a fresh connection, then the batch restarts with that event. The
/// trailing partial batch goes out on [`Output::flush`].
#[derive(Debug)]
pub struct SocketOutput {
  endpoints: Vec<Endpoint>,
  batch: Batch,
  connect_timeout: Duration,
}

impl SocketOutput {
  pub fn new(endpoints: Vec<Endpoint>, batch_bytes: usize) -> Self {
    Self {
      endpoints,
      batch: Batch::new(batch_bytes),
      connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MILLIS),
    }
  }

  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  pub(super) fn from_params(params: Params) -> Self {
    Self::new(params.endpoints, params.batch_size_bytes)
      .with_connect_timeout(Duration::from_millis(params.connect_timeout_millis))
  }

  pub fn pending(&self) -> &Batch {
    &self.batch
  }

  fn send_one(&self, endpoint: &Endpoint, payload: &[u8]) -> Result<()> {
    let to_error = |source| Error::Socket {
      endpoint: endpoint.to_string(),
      source,
    };
    let addrs = (endpoint.host.as_str(), endpoint.port)
      .to_socket_addrs()
      .map_err(to_error)?;

    let mut last_err = None;
    for addr in addrs {
      match TcpStream::connect_timeout(&addr, self.connect_timeout) {
        Ok(mut stream) => {
          stream.write_all(payload).map_err(to_error)?;
          stream.flush().map_err(to_error)?;
          return Ok(());
        },
        Err(e) => last_err = Some(e),
      }
    }
    Err(to_error(last_err.unwrap_or_else(|| {
      std::io::Error::new(std::io::ErrorKind::NotFound, "no address resolved")
    })))
  }

  /// Send `payload` to every endpoint, reporting failures one by one.
  fn send_all(&self, ctx: &OutputContext, payload: &str) {
    let mut payload = payload.to_string();
    payload.push('\n');
    for endpoint in &self.endpoints {
      if let Err(e) = self.send_one(endpoint, payload.as_bytes()) {
        ctx.reporter.report(Level::Error, e.to_string());
      }
    }
  }

  fn send_pending(&mut self, ctx: &OutputContext) {
    if self.batch.is_empty() {
      return;
    }
    let joined = self.batch.join();
    self.batch.clear();
    self.send_all(ctx, &joined);
  }
}

impl Output for SocketOutput {
  fn write(&mut self, ctx: &mut OutputContext, event: &str) -> Result<()> {
    let line = event.strip_suffix('\n').unwrap_or(event);
    if self.batch.try_add(line) {
      return Ok(());
    }

    self.send_pending(ctx);
    if !self.batch.try_add(line) {
      // larger than the whole budget
      self.send_all(ctx, line);
    }
    Ok(())
  }

  fn flush(&mut self, ctx: &mut OutputContext) -> Result<()> {
    self.send_pending(ctx);
    Ok(())
  }
}
