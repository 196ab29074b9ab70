//! Error types for the pulse engine
//!
//! The engine boundary itself never yields an error: unhealthy state is a
//! data condition (`good = false`), not an exception. These variants cover
//! the edges only - adapter construction and use after teardown.

use thiserror::Error;

/// Pulse errors
#[derive(Error, Debug)]
pub enum PulseError {
    /// The privileged host channel backing a signal adapter is unavailable
    /// (for example outside its expected runtime context)
    #[error("host channel unavailable: {0}")]
    HostChannelUnavailable(String),

    #[error("health monitor already shut down")]
    MonitorClosed,
}

/// Result type for pulse operations
pub type PulseResult<T> = Result<T, PulseError>;
