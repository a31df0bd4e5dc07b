//! # Event pipeline
//!
//! The asynchronous two-stage core. Producers format events on their own
//! thread and hand them to a pair of unbounded queues, each drained by exactly
//! one worker thread:
//!
//! ```text
//! log()  --render-->  processing queue  --chain-->  delivery queue  --fan out-->  outputs
//!        (caller)                   (processing worker)        (delivery worker)
//! ```
//!
//! ## Guarantees
//!
//! - Producers never block; queues are unbounded.
//! - One worker per queue, so processors and outputs are single-threaded and
//!   FIFO order from the processing queue carries through to the outputs.
//! - [`Pipeline::stop`] interrupts both workers, joins them, then drains the
//!   processing queue and the delivery queue on the calling thread before
//!   flushing every output. Events logged before `stop` was called are all
//!   delivered before it returns.
//! - No failure inside the pipeline reaches the application. Broken outputs,
//!   panicking processors and failed rotations are handed to the
//!   [`Reporter`], which writes to the internal-events pipeline or `tracing`.
//!
//! A slow output holds up every event behind it; there are no per-operation
//! timeouts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pipelog::config::Config;
//! use pipelog::event::CallSite;
//! use pipelog::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::start(Config::default()).unwrap();
//! pipeline.log_info("service started");
//! pipeline.log_warning(vec![("disk", "sda1"), ("free", "3%")]);
//! pipeline.stop();
//! ```

mod stage;

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::event::{CallSite, EventMetadata, Level, LogPayload};
use crate::output::{OutputContext, OutputRegistry};
use crate::processor::ProcessorRegistry;
use crate::report::Reporter;
use stage::{delivery_loop, processing_loop, Delivery, DeliveryStage, ProcessingStage};

/// Lifecycle of a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
  Running = 0,
  /// Told to stop; no longer blocking on its queue
  Interrupted = 1,
  /// Its queue is being emptied on the stopping thread
  Draining = 2,
  Terminated = 3,
}

impl WorkerState {
  fn from_u8(value: u8) -> Self {
    match value {
      0 => WorkerState::Running,
      1 => WorkerState::Interrupted,
      2 => WorkerState::Draining,
      _ => WorkerState::Terminated,
    }
  }
}

/// Snapshot of both workers' states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStates {
  pub processing: WorkerState,
  pub delivery: WorkerState,
}

/// Handles owned while the workers are alive.
struct Workers {
  /// Dropping this wakes both workers out of their blocking `select!`
  stop: Sender<()>,
  processing: JoinHandle<ProcessingStage>,
  delivery: JoinHandle<DeliveryStage>,
  processing_rx: Receiver<String>,
  delivery_rx: Receiver<Delivery>,
}

pub struct Pipeline {
  config: Arc<Config>,
  accepting: AtomicBool,
  processing_tx: Sender<String>,
  delivery_tx: Sender<Delivery>,
  workers: Mutex<Option<Workers>>,
  processing_state: Arc<AtomicU8>,
  delivery_state: Arc<AtomicU8>,
  reporter: Reporter,
}

impl Pipeline {
  /// Start a pipeline with the built-in processors and outputs.
  pub fn start(config: Config) -> Result<Self> {
    Self::start_with(config, ProcessorRegistry::builtin(), OutputRegistry::builtin())
  }

  /// Start a pipeline resolving plugin names against custom registries.
  ///
  /// When `internalEvents.enabled` is set, a second, smaller pipeline is
  /// started first and receives this pipeline's diagnostics.
  pub fn start_with(
    config: Config,
    processors: ProcessorRegistry,
    outputs: OutputRegistry,
  ) -> Result<Self> {
    let reporter = if config.internal_events.enabled {
      match Self::launch(
        config.internal(),
        &ProcessorRegistry::empty(),
        &OutputRegistry::builtin(),
        Reporter::tracing_only(),
      ) {
        Ok(internal) => Reporter::with_pipeline(Arc::new(internal)),
        Err(e) => {
          tracing::warn!(error = %e, "[pipelog] internal events pipeline unavailable");
          Reporter::tracing_only()
        },
      }
    } else {
      Reporter::tracing_only()
    };

    match Self::launch(config, &processors, &outputs, reporter.clone()) {
      Ok(pipeline) => Ok(pipeline),
      Err(e) => {
        reporter.shutdown();
        Err(e)
      },
    }
  }

  fn launch(
    config: Config,
    processors: &ProcessorRegistry,
    outputs: &OutputRegistry,
    reporter: Reporter,
  ) -> Result<Self> {
    let config = Arc::new(config);
    let chain = processors.build(&config.processors, &reporter);
    let sinks = outputs.build(&config.outputs, &reporter);
    let ctx = OutputContext::new(Arc::clone(&config), reporter.clone())?;

    let (processing_tx, processing_rx) = unbounded::<String>();
    let (delivery_tx, delivery_rx) = unbounded::<Delivery>();
    let (stop_tx, stop_rx) = unbounded::<()>();

    let processing_state = Arc::new(AtomicU8::new(WorkerState::Running as u8));
    let delivery_state = Arc::new(AtomicU8::new(WorkerState::Running as u8));

    let processing_stage = ProcessingStage::new(
      config.event.format,
      chain,
      delivery_tx.clone(),
      reporter.clone(),
    );
    let delivery_stage = DeliveryStage::new(sinks, ctx);

    let processing = {
      let (events, stop, state) = (processing_rx.clone(), stop_rx.clone(), Arc::clone(&processing_state));
      thread::Builder::new()
        .name("pipelog-processing".to_string())
        .spawn(move || processing_loop(processing_stage, events, stop, state))?
    };

    let check_interval = Duration::from_millis(config.log_rotate.check_interval_millis);
    let delivery = {
      let (messages, stop, state) = (delivery_rx.clone(), stop_rx, Arc::clone(&delivery_state));
      thread::Builder::new()
        .name("pipelog-delivery".to_string())
        .spawn(move || delivery_loop(delivery_stage, messages, stop, state, check_interval))
    };
    let delivery = match delivery {
      Ok(handle) => handle,
      Err(e) => {
        drop(stop_tx);
        let _ = processing.join();
        return Err(e.into());
      },
    };

    tracing::debug!(
      format = config.event.format.as_str(),
      processors = config.processors.len(),
      outputs = config.outputs.len(),
      "[pipelog] pipeline started"
    );

    Ok(Self {
      config,
      accepting: AtomicBool::new(true),
      processing_tx,
      delivery_tx,
      workers: Mutex::new(Some(Workers {
        stop: stop_tx,
        processing,
        delivery,
        processing_rx,
        delivery_rx,
      })),
      processing_state,
      delivery_state,
      reporter,
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn is_running(&self) -> bool {
    self.accepting.load(Ordering::Acquire)
  }

  pub fn worker_states(&self) -> WorkerStates {
    WorkerStates {
      processing: WorkerState::from_u8(self.processing_state.load(Ordering::Acquire)),
      delivery: WorkerState::from_u8(self.delivery_state.load(Ordering::Acquire)),
    }
  }

  /// Log an event. Returns whether it was enqueued.
  ///
  /// FATAL, ERROR and WARNING are always enqueued; INFO needs `infoMode` or
  /// `debugMode`, DEBUG needs `debugMode`. Anything logged after
  /// [`stop`](Self::stop) is ignored.
  pub fn log(&self, level: Level, payload: impl Into<LogPayload>, site: CallSite) -> bool {
    if !self.accepting.load(Ordering::Acquire) {
      return false;
    }
    let event = &self.config.event;
    if !level.is_enabled(event.info_mode, event.debug_mode) {
      return false;
    }

    let meta = EventMetadata::capture(level, site, &event.time_format);
    let rendered = event.format.format(&meta, &payload.into());
    self.processing_tx.send(rendered).is_ok()
  }

  #[track_caller]
  pub fn log_fatal(&self, payload: impl Into<LogPayload>) -> bool {
    self.log(Level::Fatal, payload, CallSite::caller())
  }

  #[track_caller]
  pub fn log_error(&self, payload: impl Into<LogPayload>) -> bool {
    self.log(Level::Error, payload, CallSite::caller())
  }

  #[track_caller]
  pub fn log_warning(&self, payload: impl Into<LogPayload>) -> bool {
    self.log(Level::Warning, payload, CallSite::caller())
  }

  #[track_caller]
  pub fn log_info(&self, payload: impl Into<LogPayload>) -> bool {
    self.log(Level::Info, payload, CallSite::caller())
  }

  #[track_caller]
  pub fn log_debug(&self, payload: impl Into<LogPayload>) -> bool {
    self.log(Level::Debug, payload, CallSite::caller())
  }

  /// Ask the delivery worker to evaluate rotation now, in order with the
  /// events already queued.
  pub fn request_rotation_check(&self) -> bool {
    self.is_running() && self.delivery_tx.send(Delivery::RotationCheck).is_ok()
  }

  /// Stop the pipeline and deliver everything already enqueued.
  ///
  /// ## Shutdown protocol
  /// 1. Stop accepting new events.
  /// 2. Interrupt both workers and join them; a worker finishes the event it
  ///    holds before it exits.
  /// 3. Drain the processing queue through the chain, then drain the delivery
  ///    queue through the outputs, both on this thread.
  /// 4. Flush every output, then stop the internal-events pipeline.
  ///
  /// Calling it again, or from several threads, is a no-op once one call has
  /// taken ownership of the workers.
  pub fn stop(&self) {
    self.accepting.store(false, Ordering::Release);

    let workers = self
      .workers
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
    let Some(workers) = workers else {
      return;
    };

    let Workers {
      stop,
      processing,
      delivery,
      processing_rx,
      delivery_rx,
    } = workers;
    drop(stop);

    let processing = match processing.join() {
      Ok(stage) => Some(stage),
      Err(_) => {
        self
          .reporter
          .report(Level::Error, "processing worker panicked; queued events bypass the chain");
        None
      },
    };
    let delivery = match delivery.join() {
      Ok(stage) => Some(stage),
      Err(_) => {
        self
          .reporter
          .report(Level::Error, "delivery worker panicked; queued events dropped");
        None
      },
    };

    self.set_states(WorkerState::Draining);

    let mut drained = 0usize;
    match processing {
      Some(mut stage) => {
        while let Ok(event) = processing_rx.try_recv() {
          stage.handle(event);
          drained += 1;
        }
      },
      None => {
        while let Ok(event) = processing_rx.try_recv() {
          let _ = self.delivery_tx.send(Delivery::Event(event));
          drained += 1;
        }
      },
    }

    if let Some(mut stage) = delivery {
      while let Ok(message) = delivery_rx.try_recv() {
        stage.handle(message);
        drained += 1;
      }
      stage.flush();
    }

    self.set_states(WorkerState::Terminated);
    tracing::debug!(drained, "[pipelog] pipeline stopped");

    self.reporter.shutdown();
  }

  fn set_states(&self, state: WorkerState) {
    self.processing_state.store(state as u8, Ordering::Release);
    self.delivery_state.store(state as u8, Ordering::Release);
  }
}

impl Drop for Pipeline {
  fn drop(&mut self) {
    self.stop();
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("format", &self.config.event.format)
      .field("running", &self.is_running())
      .field("workers", &self.worker_states())
      .finish()
  }
}
