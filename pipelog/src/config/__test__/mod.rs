#[cfg(test)]
mod __test__ {
  use crate::config::{CompressionFormat, Config};
  use crate::error::Error;
  use crate::formatter::EventFormat;

  #[test]
  fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.outputs.len(), 1);
    assert_eq!(config.outputs[0].name, "LogOutput");
  }

  #[test]
  fn test_deserialize_full_config() {
    let raw = r#"{
      "event": { "format": "json", "debugMode": true, "infoMode": false, "timeFormat": "%H:%M" },
      "logFile": { "path": "/var/log/app", "name": "app", "extension": ".log" },
      "logRotate": { "maxSizeInKB": 512, "rotationPeriodInSeconds": 60, "compressionFormat": "zip" },
      "internalEvents": { "enabled": true, "path": "/var/log/app/internal", "name": "int", "extension": ".log" },
      "processors": [
        { "name": "MaskPasswords" },
        { "name": "SampleProcessor", "parameters": { "sampleSize": 5 } }
      ],
      "outputs": [
        { "name": "PrintOutput" },
        { "name": "SocketOutput", "parameters": { "endpoints": [{ "host": "127.0.0.1", "port": 5140 }] } }
      ]
    }"#;

    let config: Config = serde_json::from_str(raw).unwrap();
    assert_eq!(config.event.format, EventFormat::Json);
    assert!(config.event.debug_mode);
    assert!(!config.event.info_mode);
    assert_eq!(config.event.time_format, "%H:%M");
    assert_eq!(config.log_file.name, "app");
    assert_eq!(config.log_rotate.max_size_kb, 512);
    assert_eq!(config.log_rotate.rotation_period_seconds, 60);
    assert_eq!(config.log_rotate.compression_format, CompressionFormat::Zip);
    assert_eq!(config.log_rotate.check_interval_millis, 1000);
    assert!(config.internal_events.enabled);
    assert_eq!(config.processors.len(), 2);
    assert!(config.processors[0].parameters.is_null());
    assert_eq!(config.processors[1].parameters["sampleSize"], 5);
    assert_eq!(config.outputs[1].name, "SocketOutput");
  }

  #[test]
  fn test_missing_sections_use_defaults() {
    let config: Config = serde_json::from_str(r#"{ "event": { "format": "csv" } }"#).unwrap();
    assert_eq!(config.event.format, EventFormat::Csv);
    assert!(config.event.info_mode);
    assert_eq!(config.log_file.extension, ".log");
  }

  #[test]
  fn test_validate_rejects_zero_thresholds() {
    let mut config = Config::default();
    config.log_rotate.max_size_kb = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.log_rotate.rotation_period_seconds = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.log_file.name.clear();
    match config.validate() {
      Err(Error::InvalidConfig(reason)) => assert!(reason.contains("logFile.name"), "{}", reason),
      other => panic!("expected InvalidConfig, got {:?}", other),
    }
  }

  #[test]
  fn test_internal_config() {
    let mut config = Config::default();
    config.internal_events.enabled = true;
    config.internal_events.name = "diag".to_string();
    config.processors.push(crate::config::PluginEntry::new(
      "FilterProcessor",
      serde_json::json!({ "terms": ["x"] }),
    ));

    let internal = config.internal();
    assert!(!internal.internal_events.enabled);
    assert!(internal.processors.is_empty());
    assert_eq!(internal.log_file.name, "diag");
    assert!(internal.event.debug_mode);
    assert_eq!(internal.event.format, EventFormat::Default);
  }

  #[test]
  fn test_compression_extension() {
    assert_eq!(CompressionFormat::Gzip.extension(), ".gz");
    assert_eq!(CompressionFormat::Zip.extension(), ".zip");
  }
}
