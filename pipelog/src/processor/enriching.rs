use serde::Deserialize;

use super::Processor;
use crate::formatter::{escape_csv, escape_kv, escape_xml};
use crate::utils;

/// Value appended for field names the enricher does not know.
pub const UNKNOWN_VALUE: &str = "N\\A";

#[derive(Debug, Deserialize)]
pub(super) struct Params {
  pub fields: Vec<String>,
}

/// Appends host and thread information to the rendered envelope.
///
/// Supported fields are `hostname`, `ip`, `threadName` and `threadID`.
/// Host values are resolved once at construction; thread values describe the
/// thread that runs the chain.
#[derive(Debug)]
pub struct EnrichingProcessor {
  fields: Vec<String>,
  hostname: String,
  ip: String,
}

impl EnrichingProcessor {
  pub fn new(fields: Vec<String>) -> Self {
    let ip = utils::local_ipv4()
      .map(|ip| ip.to_string())
      .unwrap_or_else(|| UNKNOWN_VALUE.to_string());
    Self {
      fields,
      hostname: utils::hostname(),
      ip,
    }
  }

  fn value_of(&self, field: &str) -> String {
    match field {
      "hostname" => self.hostname.clone(),
      "ip" => self.ip.clone(),
      "threadName" => utils::current_thread_name().unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
      "threadID" => utils::current_thread_id().to_string(),
      _ => UNKNOWN_VALUE.to_string(),
    }
  }

  fn pairs(&self) -> impl Iterator<Item = (&str, String)> + '_ {
    self
      .fields
      .iter()
      .map(|field| (field.as_str(), self.value_of(field)))
  }
}

/// Split off a single trailing line terminator so additions land before it.
fn split_newline(event: &str) -> (&str, &str) {
  match event.strip_suffix('\n') {
    Some(body) => (body, "\n"),
    None => (event, ""),
  }
}

impl Processor for EnrichingProcessor {
  fn process_kv(&mut self, event: &str) -> String {
    if event.is_empty() || self.fields.is_empty() {
      return event.to_string();
    }
    let (body, newline) = split_newline(event);
    let mut out = String::with_capacity(event.len() + 32 * self.fields.len());
    out.push_str(body);
    for (key, value) in self.pairs() {
      out.push(' ');
      out.push_str(key);
      out.push_str("=\"");
      out.push_str(&escape_kv(&value));
      out.push('"');
    }
    out.push_str(newline);
    out
  }

  fn process_json(&mut self, event: &str) -> String {
    let (body, newline) = split_newline(event);
    let Some(open) = body.strip_suffix('}') else {
      return event.to_string();
    };
    if self.fields.is_empty() {
      return event.to_string();
    }
    let mut out = String::with_capacity(event.len() + 32 * self.fields.len());
    out.push_str(open);
    let mut needs_comma = !open.trim_end().ends_with('{');
    for (key, value) in self.pairs() {
      if needs_comma {
        out.push(',');
      }
      needs_comma = true;
      // serde_json never fails on plain strings
      out.push_str(&serde_json::to_string(key).unwrap_or_default());
      out.push(':');
      out.push_str(&serde_json::to_string(&value).unwrap_or_default());
    }
    out.push('}');
    out.push_str(newline);
    out
  }

  fn process_xml(&mut self, event: &str) -> String {
    let (body, newline) = split_newline(event);
    let Some(open) = body.strip_suffix("</event>") else {
      return event.to_string();
    };
    if self.fields.is_empty() {
      return event.to_string();
    }
    let mut out = String::with_capacity(event.len() + 48 * self.fields.len());
    out.push_str(open);
    for (key, value) in self.pairs() {
      out.push('<');
      out.push_str(key);
      out.push('>');
      out.push_str(&escape_xml(&value));
      out.push_str("</");
      out.push_str(key);
      out.push('>');
    }
    out.push_str("</event>");
    out.push_str(newline);
    out
  }

  fn process_csv(&mut self, event: &str) -> String {
    if event.is_empty() || self.fields.is_empty() {
      return event.to_string();
    }
    let (body, newline) = split_newline(event);
    let mut out = String::from(body);
    for (_, value) in self.pairs() {
      out.push(',');
      out.push_str(&escape_csv(&value));
    }
    out.push_str(newline);
    out
  }
}
