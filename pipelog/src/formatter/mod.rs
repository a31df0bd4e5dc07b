//! # Formatter
//!
//! Renders [`EventMetadata`] plus a [`LogPayload`] into one of the five wire
//! forms. Every function here is pure: no hidden state, callable from any
//! producer thread, and every output is newline-terminated.
//!
//! | form        | message payload                                   |
//! |-------------|---------------------------------------------------|
//! | `default`   | `[time] LEVEL class method line: message`         |
//! | `kv`        | `time="…" level="…" … message="…"`                |
//! | `csv`       | `time,LEVEL,class,method,line,message`            |
//! | `xml`       | `<event><time>…</time>…<message>…</message></event>` |
//! | `json`      | `{"time":"…",…,"message":"…"}`                    |

mod __test__;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::event::{EventMetadata, LogPayload};

/// Payload emitted when a JSON event cannot be serialized.
pub const JSON_ERROR_EVENT: &str = "{\"error\":\"Failed to convert to JSON\"}\n";

/// Wire form selected by `event.format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
  #[default]
  Default,
  Kv,
  Csv,
  Xml,
  Json,
}

impl EventFormat {
  /// Render an event in this form.
  pub fn format(&self, meta: &EventMetadata, payload: &LogPayload) -> String {
    match payload {
      LogPayload::Message(message) => self.format_message(meta, message),
      LogPayload::Fields(fields) => self.format_fields(meta, fields),
    }
  }

  pub fn format_message(&self, meta: &EventMetadata, message: &str) -> String {
    match self {
      EventFormat::Default => default_message(meta, message),
      EventFormat::Kv => kv_message(meta, message),
      EventFormat::Csv => csv_message(meta, message),
      EventFormat::Xml => xml_message(meta, message),
      EventFormat::Json => json_message(meta, message),
    }
  }

  pub fn format_fields(&self, meta: &EventMetadata, fields: &[(String, String)]) -> String {
    match self {
      EventFormat::Default => default_fields(meta, fields),
      EventFormat::Kv => kv_fields(meta, fields),
      EventFormat::Csv => csv_fields(meta, fields),
      EventFormat::Xml => xml_fields(meta, fields),
      EventFormat::Json => json_fields(meta, fields),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      EventFormat::Default => "default",
      EventFormat::Kv => "kv",
      EventFormat::Csv => "csv",
      EventFormat::Xml => "xml",
      EventFormat::Json => "json",
    }
  }
}

//
// --- default ---
//
fn default_prefix(meta: &EventMetadata) -> String {
  format!(
    "[{}] {} {} {} {}: ",
    meta.time,
    meta.level.as_str(),
    meta.class,
    meta.method,
    meta.line
  )
}

pub fn default_message(meta: &EventMetadata, message: &str) -> String {
  let mut out = default_prefix(meta);
  out.push_str(message);
  out.push('\n');
  out
}

pub fn default_fields(meta: &EventMetadata, fields: &[(String, String)]) -> String {
  let mut out = default_prefix(meta);
  push_kv_pairs(&mut out, fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
  out.push('\n');
  out
}

//
// --- key/value ---
//
pub(crate) fn escape_kv(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn push_kv_pairs<'a>(out: &mut String, pairs: impl Iterator<Item = (&'a str, &'a str)>) {
  let mut first = true;
  for (key, value) in pairs {
    if !first {
      out.push(' ');
    }
    first = false;
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape_kv(value));
    out.push('"');
  }
}

fn kv_envelope(meta: &EventMetadata, body: &[(&str, &str)]) -> String {
  let meta_fields = meta.fields();
  let mut out = String::with_capacity(128);
  push_kv_pairs(
    &mut out,
    meta_fields
      .iter()
      .map(|(k, v)| (*k, v.as_str()))
      .chain(body.iter().copied()),
  );
  out.push('\n');
  out
}

pub fn kv_message(meta: &EventMetadata, message: &str) -> String {
  kv_envelope(meta, &[("message", message)])
}

pub fn kv_fields(meta: &EventMetadata, fields: &[(String, String)]) -> String {
  let body: Vec<(&str, &str)> = fields
    .iter()
    .map(|(k, v)| (k.as_str(), v.as_str()))
    .collect();
  kv_envelope(meta, &body)
}

//
// --- csv ---
//
pub(crate) fn escape_csv(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}

fn csv_line<'a>(meta: &EventMetadata, body: impl Iterator<Item = &'a str>) -> String {
  let meta_fields = meta.fields();
  let mut cells: Vec<String> = meta_fields.iter().map(|(_, v)| escape_csv(v)).collect();
  cells.extend(body.map(escape_csv));
  let mut out = cells.join(",");
  out.push('\n');
  out
}

pub fn csv_message(meta: &EventMetadata, message: &str) -> String {
  csv_line(meta, std::iter::once(message))
}

/// Field keys are dropped; only the values follow the metadata columns.
pub fn csv_fields(meta: &EventMetadata, fields: &[(String, String)]) -> String {
  csv_line(meta, fields.iter().map(|(_, v)| v.as_str()))
}

//
// --- xml ---
//
pub(crate) fn escape_xml(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(c),
    }
  }
  out
}

fn push_element(out: &mut String, name: &str, value: &str) {
  out.push('<');
  out.push_str(name);
  out.push('>');
  out.push_str(&escape_xml(value));
  out.push_str("</");
  out.push_str(name);
  out.push('>');
}

fn xml_envelope(meta: &EventMetadata, body: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(192);
  out.push_str("<event>");
  for (name, value) in meta.fields().iter() {
    push_element(&mut out, name, value);
  }
  for (name, value) in body {
    push_element(&mut out, name, value);
  }
  out.push_str("</event>\n");
  out
}

pub fn xml_message(meta: &EventMetadata, message: &str) -> String {
  xml_envelope(meta, &[("message", message)])
}

pub fn xml_fields(meta: &EventMetadata, fields: &[(String, String)]) -> String {
  let body: Vec<(&str, &str)> = fields
    .iter()
    .map(|(k, v)| (k.as_str(), v.as_str()))
    .collect();
  xml_envelope(meta, &body)
}

//
// --- json ---
//

/// Single-level JSON object that keeps insertion order: metadata first, then
/// the body pairs. A body key equal to a metadata key replaces that entry, so
/// every key appears once.
struct JsonEvent<'a> {
  meta: &'a EventMetadata,
  body: &'a [(&'a str, &'a str)],
}

impl Serialize for JsonEvent<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let meta_fields = self.meta.fields();
    let meta_fields: Vec<_> = meta_fields
      .iter()
      .filter(|(key, _)| !self.body.iter().any(|(k, _)| k == key))
      .collect();
    let mut map = serializer.serialize_map(Some(meta_fields.len() + self.body.len()))?;
    for (key, value) in meta_fields {
      map.serialize_entry(key, value)?;
    }
    for (key, value) in self.body {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

fn json_envelope(meta: &EventMetadata, body: &[(&str, &str)]) -> String {
  match serde_json::to_string(&JsonEvent { meta, body }) {
    Ok(mut out) => {
      out.push('\n');
      out
    },
    Err(_) => JSON_ERROR_EVENT.to_string(),
  }
}

pub fn json_message(meta: &EventMetadata, message: &str) -> String {
  json_envelope(meta, &[("message", message)])
}

pub fn json_fields(meta: &EventMetadata, fields: &[(String, String)]) -> String {
  let body: Vec<(&str, &str)> = fields
    .iter()
    .map(|(k, v)| (k.as_str(), v.as_str()))
    .collect();
  json_envelope(meta, &body)
}
