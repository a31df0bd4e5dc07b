use pipelog::config::{Config, PluginEntry};
use pipelog::formatter::EventFormat;
use pipelog::pipeline::Pipeline;
use serde_json::Value;

pub fn example_simple() {
  println!("\n--- quick start ---");

  // Step 1: describe where events go
  let mut config = Config::default();
  config.event.format = EventFormat::Kv;
  config.log_file.path = "./logs/simple".into();
  config.outputs = vec![
    PluginEntry::new("PrintOutput", Value::Null),
    PluginEntry::new("LogOutput", Value::Null),
  ];

  // Step 2: start both workers
  let pipeline = match Pipeline::start(config) {
    Ok(pipeline) => pipeline,
    Err(e) => {
      eprintln!("failed to start pipeline: {}", e);
      return;
    },
  };

  // Step 3: log messages and fields
  pipeline.log_info("application started");
  pipelog::warning!(pipeline, "disk" => "sda1", "free" => "3%");
  let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
  pipeline.log_error(pipelog::LogPayload::from_error(&err));

  // Not enabled without debug mode
  pipelog::debug!(pipeline, "this is dropped");

  // Step 4: drain and stop
  pipeline.stop();
  println!("Done! Check ./logs/simple for application-*.log");
}
