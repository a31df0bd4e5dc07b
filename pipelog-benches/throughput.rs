//! Multi-producer throughput run against the file output.
//!
//! Usage: `throughput [threads] [events-per-thread]`

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use pipelog::config::Config;
use pipelog::formatter::EventFormat;
use pipelog::pipeline::Pipeline;

fn main() {
  let mut args = std::env::args().skip(1);
  let threads: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);
  let per_thread: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(50_000);

  let dir = tempfile::TempDir::new().expect("tempdir");
  let mut config = Config::default();
  config.event.format = EventFormat::Json;
  config.log_file.path = dir.path().to_path_buf();

  let pipeline = Arc::new(Pipeline::start(config).expect("pipeline"));
  let started = Instant::now();

  let producers: Vec<_> = (0..threads)
    .map(|t| {
      let pipeline = Arc::clone(&pipeline);
      thread::spawn(move || {
        for i in 0..per_thread {
          pipeline.log_info(vec![("producer", t.to_string()), ("seq", i.to_string())]);
        }
      })
    })
    .collect();
  for producer in producers {
    producer.join().expect("producer panicked");
  }
  let enqueued = started.elapsed();

  pipeline.stop();
  let total = started.elapsed();

  let events = (threads * per_thread) as f64;
  println!("threads:        {}", threads);
  println!("events:         {}", threads * per_thread);
  println!("enqueue time:   {:?} ({:.0} events/s)", enqueued, events / enqueued.as_secs_f64());
  println!("drained by:     {:?} ({:.0} events/s)", total, events / total.as_secs_f64());
}
