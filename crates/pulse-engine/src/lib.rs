//! Pulse Engine - Node health aggregation
//!
//! This crate implements the three engine stages:
//! 1. Stability combinator: fan-in of the five coarse signals into one
//!    multicast stream of `RawTuple`s
//! 2. Chain-status pipeline: one-shot activation on API connect, then
//!    state-keyed debounce of sync transitions plus peer-count pass-through
//! 3. Health projector: combine the latest tuples into a `HealthReport`,
//!    deduplicated per subscriber
//!
//! `HealthMonitor` wires the stages together and owns their driver tasks.

pub mod chain;
pub mod monitor;
pub mod projector;
pub mod stability;

pub use chain::*;
pub use monitor::*;
pub use projector::*;
pub use stability::*;
