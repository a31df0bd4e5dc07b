#[cfg(test)]
mod __test__ {
  use serde_json::json;
  use std::fs;
  use std::io::Read;
  use std::net::TcpListener;
  use std::sync::Arc;
  use std::thread;
  use std::time::Duration;
  use tempfile::TempDir;

  use crate::config::{Config, LogFileConfig, PluginEntry};
  use crate::output::{Endpoint, LogOutput, Output, OutputContext, OutputRegistry, SocketOutput};
  use crate::report::Reporter;

  fn context(dir: &TempDir) -> OutputContext {
    let config = Config {
      log_file: LogFileConfig {
        path: dir.path().to_path_buf(),
        name: "out".to_string(),
        extension: ".log".to_string(),
      },
      ..Config::default()
    };
    OutputContext::new(Arc::new(config), Reporter::tracing_only()).unwrap()
  }

  /// Accept `n` connections and return what each one sent.
  fn collect(listener: TcpListener, n: usize) -> thread::JoinHandle<Vec<String>> {
    thread::spawn(move || {
      let mut received = Vec::new();
      for _ in 0..n {
        let (mut stream, _) = listener.accept().unwrap();
        let mut body = String::new();
        stream.read_to_string(&mut body).unwrap();
        received.push(body);
      }
      received
    })
  }

  fn listen() -> (TcpListener, Endpoint) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, Endpoint::new("127.0.0.1", port))
  }

  #[test]
  fn test_log_output_appends_lines() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    let mut out = LogOutput::new();

    out.write(&mut ctx, "first\n").unwrap();
    out.write(&mut ctx, "second").unwrap();

    let content = fs::read_to_string(ctx.log_files.active_path()).unwrap();
    assert_eq!(content, "first\nsecond\n");
  }

  #[test]
  fn test_log_output_recreates_after_removal() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    let mut out = LogOutput::new();

    out.write(&mut ctx, "one\n").unwrap();
    fs::remove_file(ctx.log_files.active_path()).unwrap();
    out.write(&mut ctx, "two\n").unwrap();

    assert_eq!(fs::read_to_string(ctx.log_files.active_path()).unwrap(), "two\n");
  }

  #[test]
  fn test_socket_sends_previous_batch_on_overflow() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    let (listener, endpoint) = listen();
    let server = collect(listener, 1);

    let mut out = SocketOutput::new(vec![endpoint], 10);
    out.write(&mut ctx, "aaaa\n").unwrap();
    out.write(&mut ctx, "bbbb\n").unwrap();
    assert_eq!(out.pending().len(), 2);

    out.write(&mut ctx, "cccc\n").unwrap();
    assert_eq!(out.pending().entries(), ["cccc"]);

    let received = server.join().unwrap();
    assert_eq!(received, ["aaaa\nbbbb\n"]);
  }

  #[test]
  fn test_socket_flush_sends_trailing_batch() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    let (listener, endpoint) = listen();
    let server = collect(listener, 1);

    let mut out = SocketOutput::new(vec![endpoint], 1024);
    out.write(&mut ctx, "only\n").unwrap();
    out.flush(&mut ctx).unwrap();
    assert!(out.pending().is_empty());

    assert_eq!(server.join().unwrap(), ["only\n"]);
  }

  #[test]
  fn test_socket_oversized_event_sent_alone() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    let (listener, endpoint) = listen();
    let server = collect(listener, 1);

    let mut out = SocketOutput::new(vec![endpoint], 4);
    out.write(&mut ctx, "much too long\n").unwrap();
    assert!(out.pending().is_empty());

    assert_eq!(server.join().unwrap(), ["much too long\n"]);
  }

  #[test]
  fn test_socket_failed_endpoint_does_not_block_others() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);

    let dead = {
      let (listener, endpoint) = listen();
      drop(listener);
      endpoint
    };
    let (listener, alive) = listen();
    let server = collect(listener, 1);

    let mut out = SocketOutput::new(vec![dead, alive], 1024)
      .with_connect_timeout(Duration::from_millis(500));
    out.write(&mut ctx, "event\n").unwrap();
    out.flush(&mut ctx).unwrap();

    assert_eq!(server.join().unwrap(), ["event\n"]);
  }

  #[test]
  fn test_builtin_outputs() {
    let registry = OutputRegistry::builtin();
    for name in ["PrintOutput", "LogOutput", "SocketOutput"] {
      assert!(registry.contains(name));
    }

    let entries = vec![
      PluginEntry::new("SocketOutput", json!({ "endpoints": [{ "host": "127.0.0.1", "port": 9 }] })),
      PluginEntry::new("SocketOutput", json!({ "endpoints": "nope" })),
      PluginEntry::new("LogOutput", serde_json::Value::Null),
    ];
    let built = registry.build(&entries, &Reporter::tracing_only());
    let names: Vec<&str> = built.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["SocketOutput", "LogOutput"]);
  }
}
