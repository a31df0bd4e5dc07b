use regex::{Captures, Regex};
use serde::Deserialize;
use std::net::Ipv4Addr;

use super::{Processor, MASK};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub(super) struct Params {
  pub ranges: Vec<String>,
}

/// An IPv4 network in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Range {
  network: u32,
  mask: u32,
}

impl Ipv4Range {
  /// Parse `a.b.c.d/n`; a bare address is treated as `/32`.
  pub fn parse(cidr: &str) -> Result<Self> {
    let invalid = || Error::InvalidCidr(cidr.to_string());
    let (addr, prefix) = match cidr.trim().split_once('/') {
      Some((addr, prefix)) => (addr, prefix.parse::<u32>().map_err(|_| invalid())?),
      None => (cidr.trim(), 32),
    };
    if prefix > 32 {
      return Err(invalid());
    }
    let network: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
    let mask = if prefix == 0 {
      0
    } else {
      u32::MAX << (32 - prefix)
    };
    Ok(Self {
      network: u32::from(network),
      mask,
    })
  }

  #[inline]
  pub fn contains(&self, ip: Ipv4Addr) -> bool {
    (u32::from(ip) & self.mask) == (self.network & self.mask)
  }
}

/// Masks the `ip` field when its address falls in any configured range.
#[derive(Debug)]
pub struct MaskIpv4Address {
  ranges: Vec<Ipv4Range>,
  kv: Regex,
  json: Regex,
  xml: Regex,
}

const IPV4: &str = r"(\d{1,3}(?:\.\d{1,3}){3})";

impl MaskIpv4Address {
  pub fn new(ranges: Vec<Ipv4Range>) -> Result<Self> {
    Ok(Self {
      ranges,
      kv: Regex::new(&format!(r#"\bip="{}""#, IPV4))?,
      json: Regex::new(&format!(r#""ip"\s*:\s*"{}""#, IPV4))?,
      xml: Regex::new(&format!(r"<ip>{}</ip>", IPV4))?,
    })
  }

  pub fn from_cidrs<S: AsRef<str>>(cidrs: &[S]) -> Result<Self> {
    let ranges = cidrs
      .iter()
      .map(|cidr| Ipv4Range::parse(cidr.as_ref()))
      .collect::<Result<Vec<_>>>()?;
    Self::new(ranges)
  }

  fn is_masked(&self, literal: &str) -> bool {
    match literal.parse::<Ipv4Addr>() {
      Ok(ip) => self.ranges.iter().any(|range| range.contains(ip)),
      Err(_) => false,
    }
  }

  fn mask_with(&self, pattern: &Regex, event: &str) -> String {
    pattern
      .replace_all(event, |caps: &Captures<'_>| {
        let (Some(whole), Some(ip)) = (caps.get(0), caps.get(1)) else {
          return String::new();
        };
        if !self.is_masked(ip.as_str()) {
          return whole.as_str().to_string();
        }
        let start = ip.start() - whole.start();
        let end = ip.end() - whole.start();
        let text = whole.as_str();
        format!("{}{}{}", &text[..start], MASK, &text[end..])
      })
      .into_owned()
  }
}

impl Processor for MaskIpv4Address {
  fn process_kv(&mut self, event: &str) -> String {
    self.mask_with(&self.kv, event)
  }

  fn process_json(&mut self, event: &str) -> String {
    self.mask_with(&self.json, event)
  }

  fn process_xml(&mut self, event: &str) -> String {
    self.mask_with(&self.xml, event)
  }
}
