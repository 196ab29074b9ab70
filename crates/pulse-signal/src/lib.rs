//! Pulse Signal - Multicast signal plumbing
//!
//! This crate implements the push-style signal layer:
//! - `Subject`: last value + subscriber set, multicast with replay-last-value
//! - `SignalInputs`: the seven inbound signal channels with their
//!   documented defaults

pub mod inputs;
pub mod subject;

pub use inputs::*;
pub use subject::*;
