use serde::Deserialize;

use super::Processor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Params {
  pub sample_size: u64,
}

/// Stateful 1-in-N gate.
///
/// Each cycle drops `N` events and lets the next one through, after which the
/// counter restarts at one. With `N = 5` the first five calls return `""`, the
/// sixth returns the event, calls seven to ten return `""` and the eleventh
/// passes again.
#[derive(Debug, Clone)]
pub struct SampleProcessor {
  sample_size: u64,
  count: u64,
}

impl SampleProcessor {
  pub fn new(sample_size: u64) -> Self {
    Self {
      sample_size,
      count: 0,
    }
  }

  fn apply(&mut self, event: &str) -> String {
    if self.count < self.sample_size {
      self.count += 1;
      String::new()
    } else {
      self.count = 1;
      event.to_string()
    }
  }
}

impl Processor for SampleProcessor {
  fn process_kv(&mut self, event: &str) -> String {
    self.apply(event)
  }

  fn process_json(&mut self, event: &str) -> String {
    self.apply(event)
  }

  fn process_xml(&mut self, event: &str) -> String {
    self.apply(event)
  }

  fn process_csv(&mut self, event: &str) -> String {
    self.apply(event)
  }
}
