#[cfg(test)]
mod __test__ {
  use serde::Deserialize;
  use serde_json::{json, Value};

  use crate::config::PluginEntry;
  use crate::error::Error;
  use crate::registry::{decode, Registry};
  use crate::report::Reporter;

  #[derive(Debug, Deserialize)]
  struct Params {
    width: u32,
  }

  fn registry() -> Registry<u32> {
    let mut registry = Registry::empty();
    registry.register("Fixed", |_| Ok(7));
    registry.register("Sized", |params: &Value| {
      let params: Params = decode("Sized", params)?;
      Ok(params.width)
    });
    registry
  }

  #[test]
  fn test_create_known_and_unknown() {
    let registry = registry();
    assert_eq!(registry.create(&PluginEntry::new("Fixed", Value::Null)).unwrap(), 7);
    match registry.create(&PluginEntry::new("Missing", Value::Null)) {
      Err(Error::UnknownPlugin(name)) => assert_eq!(name, "Missing"),
      other => panic!("expected UnknownPlugin, got {:?}", other),
    }
  }

  #[test]
  fn test_bad_parameters() {
    let registry = registry();
    let entry = PluginEntry::new("Sized", json!({ "width": "wide" }));
    assert!(matches!(
      registry.create(&entry),
      Err(Error::InvalidParameters { ref plugin, .. }) if plugin == "Sized"
    ));
  }

  #[test]
  fn test_build_skips_bad_entries() {
    let registry = registry();
    let entries = vec![
      PluginEntry::new("Missing", Value::Null),
      PluginEntry::new("Sized", json!({ "width": 3 })),
      PluginEntry::new("Sized", json!({ "width": 9 })),
      PluginEntry::new("Sized", json!({})),
      PluginEntry::new("Fixed", Value::Null),
    ];
    let built = registry.build(&entries, &Reporter::tracing_only());
    assert_eq!(built, vec![("Sized".to_string(), 3), ("Fixed".to_string(), 7)]);
  }

  #[test]
  fn test_failed_entry_does_not_claim_name() {
    let registry = registry();
    let entries = vec![
      PluginEntry::new("Sized", json!({})),
      PluginEntry::new("Sized", json!({ "width": 4 })),
    ];
    let built = registry.build(&entries, &Reporter::tracing_only());
    assert_eq!(built, vec![("Sized".to_string(), 4)]);
  }

  #[test]
  fn test_register_replaces() {
    let mut registry = registry();
    registry.register("Fixed", |_| Ok(1));
    assert_eq!(registry.create(&PluginEntry::new("Fixed", Value::Null)).unwrap(), 1);
    let mut names: Vec<&str> = registry.names().collect();
    names.sort();
    assert_eq!(names, ["Fixed", "Sized"]);
  }
}
