//! Per-stage logic shared by the worker threads and the shutdown drain.

use crossbeam_channel::{never, select, tick, Receiver, Sender};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::WorkerState;
use crate::event::Level;
use crate::formatter::EventFormat;
use crate::output::{Output, OutputContext};
use crate::processor::Processor;
use crate::report::Reporter;

/// Message on the delivery queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Delivery {
  /// A processed event; empty when a processor suppressed it
  Event(String),
  /// Evaluate log file rotation now
  RotationCheck,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "unknown panic"
  }
}

/// Runs the processor chain and forwards results to the delivery queue.
pub(crate) struct ProcessingStage {
  format: EventFormat,
  processors: Vec<(String, Box<dyn Processor>)>,
  delivery: Sender<Delivery>,
  reporter: Reporter,
}

impl ProcessingStage {
  pub(crate) fn new(
    format: EventFormat,
    processors: Vec<(String, Box<dyn Processor>)>,
    delivery: Sender<Delivery>,
    reporter: Reporter,
  ) -> Self {
    Self {
      format,
      processors,
      delivery,
      reporter,
    }
  }

  /// Run the chain in order. A stage that panics is skipped for this event.
  pub(crate) fn process(&mut self, event: String) -> String {
    let format = self.format;
    let mut current = event;
    for (name, processor) in self.processors.iter_mut() {
      match catch_unwind(AssertUnwindSafe(|| processor.process(format, &current))) {
        Ok(next) => current = next,
        Err(panic) => self.reporter.report(
          Level::Error,
          format!("processor `{}` panicked: {}", name, panic_message(panic.as_ref())),
        ),
      }
    }
    current
  }

  pub(crate) fn handle(&mut self, event: String) {
    let processed = self.process(event);
    if self.delivery.send(Delivery::Event(processed)).is_err() {
      self
        .reporter
        .report(Level::Error, "delivery queue closed, event dropped");
    }
  }
}

/// Fans events out to the outputs and runs rotation checks.
pub(crate) struct DeliveryStage {
  outputs: Vec<(String, Box<dyn Output>)>,
  ctx: OutputContext,
}

impl DeliveryStage {
  pub(crate) fn new(outputs: Vec<(String, Box<dyn Output>)>, ctx: OutputContext) -> Self {
    Self { outputs, ctx }
  }

  pub(crate) fn handle(&mut self, message: Delivery) {
    match message {
      Delivery::Event(event) => self.dispatch(&event),
      Delivery::RotationCheck => self.rotate(),
    }
  }

  /// Write to every output; failures are reported per output.
  pub(crate) fn dispatch(&mut self, event: &str) {
    if event.is_empty() {
      return;
    }
    for (name, output) in self.outputs.iter_mut() {
      let ctx = &mut self.ctx;
      match catch_unwind(AssertUnwindSafe(|| output.write(ctx, event))) {
        Ok(Ok(())) => {},
        Ok(Err(e)) => ctx
          .reporter
          .report(Level::Error, format!("output `{}` failed: {}", name, e)),
        Err(panic) => ctx.reporter.report(
          Level::Error,
          format!("output `{}` panicked: {}", name, panic_message(panic.as_ref())),
        ),
      }
    }
  }

  pub(crate) fn rotate(&mut self) {
    let outcome = self.ctx.log_files.rotate_due();
    for archive in &outcome.rotated {
      self
        .ctx
        .reporter
        .report(Level::Info, format!("rotated log file to {}", archive.display()));
    }
    for e in outcome.errors {
      self
        .ctx
        .reporter
        .report(Level::Error, format!("log rotation failed: {}", e));
    }
  }

  /// Flush every output once.
  pub(crate) fn flush(&mut self) {
    for (name, output) in self.outputs.iter_mut() {
      let ctx = &mut self.ctx;
      match catch_unwind(AssertUnwindSafe(|| output.flush(ctx))) {
        Ok(Ok(())) => {},
        Ok(Err(e)) => ctx
          .reporter
          .report(Level::Error, format!("output `{}` failed to flush: {}", name, e)),
        Err(panic) => ctx.reporter.report(
          Level::Error,
          format!("output `{}` panicked on flush: {}", name, panic_message(panic.as_ref())),
        ),
      }
    }
  }
}

/// Blocking loop of the processing worker.
///
/// Each popped event is fully processed and forwarded before the loop looks at
/// the stop channel again. Returns the stage so the caller can keep draining.
pub(crate) fn processing_loop(
  mut stage: ProcessingStage,
  events: Receiver<String>,
  stop: Receiver<()>,
  state: Arc<AtomicU8>,
) -> ProcessingStage {
  loop {
    select! {
      recv(events) -> msg => match msg {
        Ok(event) => stage.handle(event),
        Err(_) => break,
      },
      recv(stop) -> _ => break,
    }
  }
  state.store(WorkerState::Interrupted as u8, Ordering::Release);
  stage
}

/// Blocking loop of the delivery worker; also runs periodic rotation checks.
pub(crate) fn delivery_loop(
  mut stage: DeliveryStage,
  messages: Receiver<Delivery>,
  stop: Receiver<()>,
  state: Arc<AtomicU8>,
  check_interval: Duration,
) -> DeliveryStage {
  let ticker: Receiver<Instant> = if check_interval.is_zero() {
    never()
  } else {
    tick(check_interval)
  };

  loop {
    select! {
      recv(messages) -> msg => match msg {
        Ok(message) => stage.handle(message),
        Err(_) => break,
      },
      recv(ticker) -> _ => stage.rotate(),
      recv(stop) -> _ => break,
    }
  }
  state.store(WorkerState::Interrupted as u8, Ordering::Release);
  stage
}
