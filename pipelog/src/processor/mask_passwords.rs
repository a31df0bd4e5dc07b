use regex::{NoExpand, Regex};

use super::{Processor, MASK};
use crate::error::Result;

/// Replaces the value of every `password` field with [`MASK`].
#[derive(Debug)]
pub struct MaskPasswords {
  kv: Regex,
  json: Regex,
  xml: Regex,
  kv_mask: String,
  json_mask: String,
  xml_mask: String,
}

impl MaskPasswords {
  pub fn new() -> Result<Self> {
    Ok(Self {
      // quoted, escaped-quoted (nested in another quoted value), or bare
      kv: Regex::new(r#"\bpassword=(?:"(?:[^"\\]|\\.)*"|\\"(?:[^"\\]|\\.)*?\\"|[^\s"\\]+)"#)?,
      json: Regex::new(r#""password"\s*:\s*"(?:[^"\\]|\\.)*""#)?,
      xml: Regex::new(r"<password>[^<]*</password>")?,
      kv_mask: format!("password={}", MASK),
      json_mask: format!("\"password\":\"{}\"", MASK),
      xml_mask: format!("<password>{}</password>", MASK),
    })
  }
}

impl Processor for MaskPasswords {
  fn process_kv(&mut self, event: &str) -> String {
    self
      .kv
      .replace_all(event, NoExpand(&self.kv_mask))
      .into_owned()
  }

  fn process_json(&mut self, event: &str) -> String {
    self
      .json
      .replace_all(event, NoExpand(&self.json_mask))
      .into_owned()
  }

  fn process_xml(&mut self, event: &str) -> String {
    self
      .xml
      .replace_all(event, NoExpand(&self.xml_mask))
      .into_owned()
  }
}
