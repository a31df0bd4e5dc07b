use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use super::Processor;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub(super) struct Params {
  pub rules: Vec<RegexRule>,
}

/// One `(fieldName, regex, replacement)` rewrite.
///
/// `regex` matches the field's value only; it is wrapped in the field syntax
/// of each wire form before compiling. The replacement is inserted literally,
/// so it must contain the whole field (for example `user="anon"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexRule {
  pub field_name: String,
  pub regex: String,
  pub replacement: String,
}

impl RegexRule {
  pub fn new(
    field_name: impl Into<String>,
    regex: impl Into<String>,
    replacement: impl Into<String>,
  ) -> Self {
    Self {
      field_name: field_name.into(),
      regex: regex.into(),
      replacement: replacement.into(),
    }
  }
}

#[derive(Debug)]
struct CompiledRule {
  kv: Regex,
  json: Regex,
  xml: Regex,
  replacement: String,
}

impl CompiledRule {
  fn compile(rule: &RegexRule) -> Result<Self> {
    let field = regex::escape(&rule.field_name);
    Ok(Self {
      kv: Regex::new(&format!(r#"{}="{}""#, field, rule.regex))?,
      json: Regex::new(&format!(r#""{}"\s*:\s*"{}""#, field, rule.regex))?,
      xml: Regex::new(&format!(r"<{0}>{1}</{0}>", field, rule.regex))?,
      replacement: rule.replacement.clone(),
    })
  }
}

/// Applies configured field rewrites in order.
#[derive(Debug)]
pub struct RegexProcessor {
  rules: Vec<CompiledRule>,
}

impl RegexProcessor {
  pub fn new(rules: Vec<RegexRule>) -> Result<Self> {
    let rules = rules
      .iter()
      .map(CompiledRule::compile)
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { rules })
  }

  fn apply(&self, event: &str, pick: impl Fn(&CompiledRule) -> &Regex) -> String {
    let mut out = event.to_string();
    for rule in &self.rules {
      out = pick(rule)
        .replace_all(&out, NoExpand(&rule.replacement))
        .into_owned();
    }
    out
  }
}

impl Processor for RegexProcessor {
  fn process_kv(&mut self, event: &str) -> String {
    self.apply(event, |rule| &rule.kv)
  }

  fn process_json(&mut self, event: &str) -> String {
    self.apply(event, |rule| &rule.json)
  }

  fn process_xml(&mut self, event: &str) -> String {
    self.apply(event, |rule| &rule.xml)
  }
}
