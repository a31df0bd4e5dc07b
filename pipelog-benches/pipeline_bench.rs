use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::hint::black_box;
use std::time::Duration;

use pipelog::config::{Config, PluginEntry};
use pipelog::event::{CallSite, EventMetadata, Level};
use pipelog::formatter::EventFormat;
use pipelog::output::{Output, OutputContext, OutputRegistry};
use pipelog::pipeline::Pipeline;
use pipelog::processor::{Processor, ProcessorRegistry};
use pipelog::Result;

fn configure_criterion() -> Criterion {
  Criterion::default()
    .sample_size(30)
    .measurement_time(Duration::from_secs(5))
    .warm_up_time(Duration::from_secs(2))
}

const FORMATS: [EventFormat; 5] = [
  EventFormat::Default,
  EventFormat::Kv,
  EventFormat::Csv,
  EventFormat::Xml,
  EventFormat::Json,
];

/// Discards everything; isolates queueing and processing cost.
struct NullOutput;

impl Output for NullOutput {
  fn write(&mut self, _ctx: &mut OutputContext, event: &str) -> Result<()> {
    black_box(event);
    Ok(())
  }
}

fn sample_fields() -> Vec<(String, String)> {
  vec![
    ("user".to_string(), "alice".to_string()),
    ("ip".to_string(), "192.168.1.100".to_string()),
    ("password".to_string(), "hunter2".to_string()),
    ("action".to_string(), "login".to_string()),
  ]
}

fn bench_formatter(c: &mut Criterion) {
  let mut group = c.benchmark_group("formatter");
  let meta = EventMetadata::new("2024-05-01 10:00:00.000", Level::Info, "bench::auth", "login", 42);
  let fields = sample_fields();

  for format in FORMATS {
    group.bench_with_input(BenchmarkId::new("fields", format.as_str()), &format, |b, format| {
      b.iter(|| black_box(format.format_fields(&meta, &fields)))
    });
    group.bench_with_input(BenchmarkId::new("message", format.as_str()), &format, |b, format| {
      b.iter(|| black_box(format.format_message(&meta, "user alice logged in")))
    });
  }
  group.finish();
}

fn processor_entries() -> Vec<PluginEntry> {
  vec![
    PluginEntry::new("MaskPasswords", Value::Null),
    PluginEntry::new("MaskIPV4Address", json!({ "ranges": ["192.168.1.0/24", "10.0.0.0/8"] })),
    PluginEntry::new("FilterProcessor", json!({ "terms": ["healthcheck"] })),
    PluginEntry::new(
      "RegexProcessor",
      json!({ "rules": [{ "fieldName": "user", "regex": "[a-z]+", "replacement": "user=\"anon\"" }] }),
    ),
  ]
}

fn bench_processor_chain(c: &mut Criterion) {
  let mut group = c.benchmark_group("processor_chain");
  let meta = EventMetadata::new("2024-05-01 10:00:00.000", Level::Info, "bench::auth", "login", 42);
  let fields = sample_fields();
  let registry = ProcessorRegistry::builtin();

  for format in [EventFormat::Kv, EventFormat::Xml, EventFormat::Json] {
    let event = format.format_fields(&meta, &fields);
    let mut chain = registry.build(&processor_entries(), &Default::default());
    group.bench_function(format.as_str(), |b| {
      b.iter(|| {
        let mut current = event.clone();
        for (_, stage) in chain.iter_mut() {
          current = stage.process(format, &current);
        }
        black_box(current)
      })
    });
  }
  group.finish();
}

fn start_pipeline(dir: &tempfile::TempDir) -> Pipeline {
  let mut config = Config::default();
  config.event.format = EventFormat::Kv;
  config.log_file.path = dir.path().to_path_buf();
  config.log_rotate.check_interval_millis = 0;
  config.processors = processor_entries();
  config.outputs = vec![PluginEntry::new("NullOutput", Value::Null)];

  let mut outputs = OutputRegistry::empty();
  outputs.register("NullOutput", |_| Ok(Box::new(NullOutput) as Box<dyn Output>));
  match Pipeline::start_with(config, ProcessorRegistry::builtin(), outputs) {
    Ok(pipeline) => pipeline,
    Err(e) => panic!("failed to start pipeline: {}", e),
  }
}

fn bench_end_to_end(c: &mut Criterion) {
  let mut group = c.benchmark_group("pipeline");
  let dir = tempfile::TempDir::new().expect("tempdir");

  for batch in [100u64, 1_000, 10_000] {
    group.throughput(Throughput::Elements(batch));
    group.bench_with_input(BenchmarkId::new("log_then_stop", batch), &batch, |b, &batch| {
      b.iter(|| {
        let pipeline = start_pipeline(&dir);
        for i in 0..batch {
          pipeline.log(
            Level::Warning,
            vec![("seq", i.to_string()), ("password", "hunter2".to_string())],
            CallSite::new("bench", "end_to_end", 1),
          );
        }
        pipeline.stop();
      })
    });
  }
  group.finish();
}

criterion_group! {
  name = benches;
  config = configure_criterion();
  targets =
    bench_formatter,
    bench_processor_chain,
    bench_end_to_end,
}

criterion_main!(benches);
