//! Pulse Core - Fundamental types for node health aggregation
//!
//! This crate defines the types shared across the health engine:
//! - Chain sync status and peer samples (raw inbound signals)
//! - Signal tuples (combined snapshots of the inbound signals)
//! - The health report model (the engine's sole outbound artifact)
//! - Error types

pub mod error;
pub mod report;
pub mod status;
pub mod tuple;

pub use error::*;
pub use report::*;
pub use status::*;
pub use tuple::*;
