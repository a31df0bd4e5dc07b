use pipelog::config::{Config, PluginEntry};
use pipelog::formatter::EventFormat;
use pipelog::pipeline::Pipeline;
use serde_json::{json, Value};

pub fn example_masking() {
  println!("\n--- processors ---");

  let mut config = Config::default();
  config.event.format = EventFormat::Json;
  config.event.debug_mode = true;
  config.log_file.path = "./logs/masking".into();
  config.processors = vec![
    PluginEntry::new("MaskPasswords", Value::Null),
    PluginEntry::new("MaskIPV4Address", json!({ "ranges": ["192.168.1.0/24"] })),
    PluginEntry::new("EnrichingProcessor", json!({ "fields": ["hostname", "threadName"] })),
    PluginEntry::new("FilterProcessor", json!({ "terms": ["healthcheck"] })),
  ];
  config.outputs = vec![PluginEntry::new("PrintOutput", Value::Null)];

  let pipeline = match Pipeline::start(config) {
    Ok(pipeline) => pipeline,
    Err(e) => {
      eprintln!("failed to start pipeline: {}", e);
      return;
    },
  };

  pipelog::info!(pipeline, "user" => "alice", "password" => "hunter2", "ip" => "192.168.1.100");
  pipelog::info!(pipeline, "user" => "bob", "ip" => "172.16.0.1");
  pipelog::debug!(pipeline, "healthcheck ok");

  pipeline.stop();
}
