//! Logging macros that fill in the call site.
//!
//! ```rust,no_run
//! use pipelog::config::Config;
//! use pipelog::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::start(Config::default()).unwrap();
//! pipelog::info!(pipeline, "user {} logged in", "bob");
//! pipelog::warning!(pipeline, "disk" => "sda1", "free" => "3%");
//! pipeline.stop();
//! ```

/// [`CallSite`](crate::event::CallSite) of the macro invocation: module path,
/// enclosing function and line.
#[macro_export]
macro_rules! call_site {
  () => {
    $crate::event::CallSite::new(::std::module_path!(), $crate::__function_name!(), ::std::line!())
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
  () => {{
    fn __here() {}
    fn type_name_of<T>(_: T) -> &'static str {
      ::std::any::type_name::<T>()
    }
    let name: &'static str = type_name_of(__here);
    let name = name.strip_suffix("::__here").unwrap_or(name);
    let name = name.trim_end_matches("::{{closure}}");
    match name.rfind("::") {
      Some(i) => &name[i + 2..],
      None => name,
    }
  }};
}

/// Log at an explicit level, either `key => value` pairs or a format string.
#[macro_export]
macro_rules! log_event {
  ($pipeline:expr, $level:expr, $($key:expr => $value:expr),+ $(,)?) => {
    $pipeline.log(
      $level,
      $crate::event::LogPayload::fields([$(($key.to_string(), $value.to_string())),+]),
      $crate::call_site!(),
    )
  };
  ($pipeline:expr, $level:expr, $($arg:tt)+) => {
    $pipeline.log($level, ::std::format!($($arg)+), $crate::call_site!())
  };
}

#[macro_export]
macro_rules! fatal {
  ($pipeline:expr, $($rest:tt)+) => {
    $crate::log_event!($pipeline, $crate::event::Level::Fatal, $($rest)+)
  };
}

#[macro_export]
macro_rules! error {
  ($pipeline:expr, $($rest:tt)+) => {
    $crate::log_event!($pipeline, $crate::event::Level::Error, $($rest)+)
  };
}

#[macro_export]
macro_rules! warning {
  ($pipeline:expr, $($rest:tt)+) => {
    $crate::log_event!($pipeline, $crate::event::Level::Warning, $($rest)+)
  };
}

#[macro_export]
macro_rules! info {
  ($pipeline:expr, $($rest:tt)+) => {
    $crate::log_event!($pipeline, $crate::event::Level::Info, $($rest)+)
  };
}

#[macro_export]
macro_rules! debug {
  ($pipeline:expr, $($rest:tt)+) => {
    $crate::log_event!($pipeline, $crate::event::Level::Debug, $($rest)+)
  };
}

#[cfg(test)]
mod tests {
  use serde_json::Value;
  use std::sync::{Arc, Mutex};
  use tempfile::TempDir;

  use crate::config::{Config, PluginEntry};
  use crate::error::Result;
  use crate::formatter::EventFormat;
  use crate::output::{Output, OutputContext, OutputRegistry};
  use crate::pipeline::Pipeline;
  use crate::processor::ProcessorRegistry;

  struct Capture(Arc<Mutex<Vec<String>>>);

  impl Output for Capture {
    fn write(&mut self, _ctx: &mut OutputContext, event: &str) -> Result<()> {
      self.0.lock().unwrap().push(event.to_string());
      Ok(())
    }
  }

  fn pipeline(dir: &TempDir, events: &Arc<Mutex<Vec<String>>>) -> Pipeline {
    let mut config = Config::default();
    config.event.format = EventFormat::Kv;
    config.event.debug_mode = true;
    config.log_file.path = dir.path().to_path_buf();
    config.outputs = vec![PluginEntry::new("Capture", Value::Null)];

    let mut outputs = OutputRegistry::empty();
    let sink = Arc::clone(events);
    outputs.register("Capture", move |_| Ok(Box::new(Capture(Arc::clone(&sink))) as Box<dyn Output>));
    Pipeline::start_with(config, ProcessorRegistry::empty(), outputs).unwrap()
  }

  #[test]
  fn test_call_site_names_function() {
    let site = call_site!();
    assert_eq!(site.class, module_path!());
    assert_eq!(site.method, "test_call_site_names_function");
    assert_eq!(site.line, line!() - 3);
  }

  #[test]
  fn test_level_macros() {
    let dir = TempDir::new().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let p = pipeline(&dir, &events);

    fatal!(p, "f {}", 1);
    error!(p, "e");
    warning!(p, "w");
    info!(p, "user {} logged in", "bob");
    debug!(p, "d");
    p.stop();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 5);
    assert!(events[0].contains("level=\"FATAL\"") && events[0].contains("message=\"f 1\""));
    assert!(events[3].contains("message=\"user bob logged in\""));
    assert!(events[3].contains("method=\"test_level_macros\""));
    assert!(events[4].contains("level=\"DEBUG\""));
  }

  #[test]
  fn test_field_pairs() {
    let dir = TempDir::new().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let p = pipeline(&dir, &events);

    let free = 3;
    warning!(p, "disk" => "sda1", "free" => free);
    p.stop();

    let events = events.lock().unwrap();
    assert!(events[0].ends_with("disk=\"sda1\" free=\"3\"\n"), "{}", events[0]);
  }
}
