use std::io::Read;
use std::net::TcpListener;
use std::thread;

use pipelog::config::{Config, PluginEntry};
use pipelog::formatter::EventFormat;
use pipelog::pipeline::Pipeline;
use serde_json::json;

pub fn example_socket() {
  println!("\n--- socket output ---");

  let listener = match TcpListener::bind("127.0.0.1:0") {
    Ok(listener) => listener,
    Err(e) => {
      eprintln!("cannot bind collector: {}", e);
      return;
    },
  };
  let port = listener.local_addr().map(|a| a.port()).unwrap_or_default();

  // Collector: print the batch it receives
  let collector = thread::spawn(move || {
    for stream in listener.incoming().take(1).flatten() {
      let mut stream = stream;
      let mut body = String::new();
      if stream.read_to_string(&mut body).is_ok() {
        println!("collector received {} bytes:\n{}", body.len(), body);
      }
    }
  });

  let mut config = Config::default();
  config.event.format = EventFormat::Csv;
  config.log_file.path = "./logs/socket".into();
  config.outputs = vec![PluginEntry::new(
    "SocketOutput",
    json!({ "endpoints": [{ "host": "127.0.0.1", "port": port }], "batchSizeBytes": 4096 }),
  )];

  let pipeline = match Pipeline::start(config) {
    Ok(pipeline) => pipeline,
    Err(e) => {
      eprintln!("failed to start pipeline: {}", e);
      return;
    },
  };

  for i in 0..6 {
    pipelog::warning!(pipeline, "order" => i, "status" => "delayed");
  }

  // The trailing partial batch is sent while stopping
  pipeline.stop();
  let _ = collector.join();
}
