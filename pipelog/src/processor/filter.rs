use serde::Deserialize;

use super::Processor;

#[derive(Debug, Deserialize)]
pub(super) struct Params {
  pub terms: Vec<String>,
}

/// Suppresses events that contain every configured term.
///
/// Matching is a plain substring test on the rendered text, so it behaves the
/// same for every wire form. An empty term list suppresses nothing.
#[derive(Debug, Clone)]
pub struct FilterProcessor {
  terms: Vec<String>,
}

impl FilterProcessor {
  pub fn new(terms: Vec<String>) -> Self {
    Self { terms }
  }

  pub fn matches(&self, event: &str) -> bool {
    !self.terms.is_empty() && self.terms.iter().all(|term| event.contains(term.as_str()))
  }

  fn apply(&self, event: &str) -> String {
    if self.matches(event) {
      String::new()
    } else {
      event.to_string()
    }
  }
}

impl Processor for FilterProcessor {
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
