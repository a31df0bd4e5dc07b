//! Name -> factory registries for processors and outputs.
//!
//! Plugins are built once at pipeline startup from the configured
//! `{name, parameters}` entries. Lookup is a single hash probe per entry.
//! Entries that name an unknown plugin, carry bad parameters, or repeat a
//! plugin that was already built are reported and skipped; the rest of the
//! list is still built.

mod __test__;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::config::PluginEntry;
use crate::error::{Error, Result};
use crate::event::Level;
use crate::report::Reporter;

type Factory<T> = Box<dyn Fn(&Value) -> Result<T> + Send + Sync>;

pub struct Registry<T> {
  factories: HashMap<String, Factory<T>>,
}

impl<T> Registry<T> {
  /// A registry with no factories at all.
  pub fn empty() -> Self {
    Self {
      factories: HashMap::new(),
    }
  }

  /// Register (or replace) the factory for `name`.
  pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
  where
    F: Fn(&Value) -> Result<T> + Send + Sync + 'static,
  {
    self.factories.insert(name.into(), Box::new(factory));
  }

  pub fn contains(&self, name: &str) -> bool {
    self.factories.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  /// Build a single entry.
  pub fn create(&self, entry: &PluginEntry) -> Result<T> {
    let factory = self
      .factories
      .get(&entry.name)
      .ok_or_else(|| Error::UnknownPlugin(entry.name.clone()))?;
    factory(&entry.parameters)
  }

  /// Build every entry in order, keeping at most one instance per name.
  pub fn build(&self, entries: &[PluginEntry], reporter: &Reporter) -> Vec<(String, T)> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut built = Vec::with_capacity(entries.len());

    for entry in entries {
      if seen.contains(entry.name.as_str()) {
        reporter.report(
          Level::Warning,
          format!("duplicate plugin `{}` ignored", entry.name),
        );
        continue;
      }

      match self.create(entry) {
        Ok(plugin) => {
          seen.insert(entry.name.as_str());
          built.push((entry.name.clone(), plugin));
        },
        Err(e) => reporter.report(Level::Error, format!("skipping plugin entry: {}", e)),
      }
    }

    built
  }
}

impl<T> Default for Registry<T> {
  fn default() -> Self {
    Self::empty()
  }
}

/// Decode a plugin's `parameters` object into its typed parameter struct.
pub fn decode<T: DeserializeOwned>(plugin: &str, params: &Value) -> Result<T> {
  serde_json::from_value(params.clone()).map_err(|source| Error::InvalidParameters {
    plugin: plugin.to_string(),
    source,
  })
}
