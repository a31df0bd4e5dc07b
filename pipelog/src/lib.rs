#[macro_use]
pub mod macros;

pub mod batch;
pub mod compression;
pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod log_file;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod registry;
pub mod report;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{CallSite, Level, LogPayload};
pub use pipeline::Pipeline;
