//! `sentiment-flow` host
//!
//! Wires the sentiment processor to a CoreNLP server and feeds it work units
//! from JSON lines.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod host;

pub use config::FlowConfig;
pub use host::{process_all, process_unit, read_units, Report};
