//! # Processor chain
//!
//! Text-transform stages that run on the processing worker after an event has
//! been rendered. A stage only ever sees the rendered string, so every stage
//! offers one entry point per wire form and picks its patterns accordingly.
//!
//! The chain is sequential: the output of stage *i* is the input of stage
//! *i + 1*, including an empty string produced by a suppressing stage.

mod enriching;
mod filter;
mod mask_ipv4;
mod mask_passwords;
mod regex_rewrite;
mod sample;

pub use enriching::EnrichingProcessor;
pub use filter::FilterProcessor;
pub use mask_ipv4::{Ipv4Range, MaskIpv4Address};
pub use mask_passwords::MaskPasswords;
pub use regex_rewrite::{RegexProcessor, RegexRule};
pub use sample::SampleProcessor;

use crate::formatter::EventFormat;
use crate::registry::{decode, Registry};

/// Replacement text used by the masking stages.
pub const MASK: &str = "***";

/// A single stage of the processor chain.
///
/// Stages run on the one processing worker, so `&mut self` state (counters,
/// caches) needs no synchronization.
pub trait Processor: Send {
  fn process_kv(&mut self, event: &str) -> String;

  fn process_json(&mut self, event: &str) -> String;

  fn process_xml(&mut self, event: &str) -> String;

  /// CSV rows carry no field names, so field-bound stages pass them through.
  fn process_csv(&mut self, event: &str) -> String {
    event.to_string()
  }

  /// Dispatch on the configured wire form.
  ///
  /// The default envelope carries `key="value"` pairs, so it shares the
  /// key/value entry point.
  fn process(&mut self, format: EventFormat, event: &str) -> String {
    match format {
      EventFormat::Default | EventFormat::Kv => self.process_kv(event),
      EventFormat::Json => self.process_json(event),
      EventFormat::Xml => self.process_xml(event),
      EventFormat::Csv => self.process_csv(event),
    }
  }
}

pub type ProcessorRegistry = Registry<Box<dyn Processor>>;

impl Registry<Box<dyn Processor>> {
  /// Registry pre-populated with every built-in stage.
  pub fn builtin() -> Self {
    let mut registry = Self::empty();
    registry.register("MaskPasswords", |_| {
      Ok(Box::new(MaskPasswords::new()?) as Box<dyn Processor>)
    });
    registry.register("MaskIPV4Address", |params| {
      let params: mask_ipv4::Params = decode("MaskIPV4Address", params)?;
      Ok(Box::new(MaskIpv4Address::from_cidrs(&params.ranges)?) as Box<dyn Processor>)
    });
    registry.register("EnrichingProcessor", |params| {
      let params: enriching::Params = decode("EnrichingProcessor", params)?;
      Ok(Box::new(EnrichingProcessor::new(params.fields)) as Box<dyn Processor>)
    });
    registry.register("FilterProcessor", |params| {
      let params: filter::Params = decode("FilterProcessor", params)?;
      Ok(Box::new(FilterProcessor::new(params.terms)) as Box<dyn Processor>)
    });
    registry.register("SampleProcessor", |params| {
      let params: sample::Params = decode("SampleProcessor", params)?;
      Ok(Box::new(SampleProcessor::new(params.sample_size)) as Box<dyn Processor>)
    });
    registry.register("RegexProcessor", |params| {
      let params: regex_rewrite::Params = decode("RegexProcessor", params)?;
      Ok(Box::new(RegexProcessor::new(params.rules)?) as Box<dyn Processor>)
    });
    registry
  }
}
