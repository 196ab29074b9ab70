//! Signal tuples - combined snapshots of the inbound signals

use crate::SyncStatus;

/// Snapshot of the five coarse stability signals
///
/// One immutable tuple per upstream emission; ordering follows the arrival
/// order of the latest-value fan-in.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTuple {
    /// Local client process is running
    pub process_alive: bool,
    /// API transport to the client is established
    pub api_connected: bool,
    /// Client binary download progress in [0, 1]
    pub download_progress: f64,
    /// Platform-reported internet connectivity
    pub online: bool,
    /// Local wall clock agrees with network time
    pub clock_sync: bool,
}

impl Default for RawTuple {
    /// Documented signal defaults: nothing running or connected, clock
    /// optimistically in sync
    fn default() -> Self {
        RawTuple {
            process_alive: false,
            api_connected: false,
            download_progress: 0.0,
            online: false,
            clock_sync: true,
        }
    }
}

/// Snapshot of the chain-status pipeline output
#[derive(Clone, Debug, PartialEq)]
pub struct ChainTuple {
    /// Debounced sync status
    pub sync: SyncStatus,
    /// Latest peer count; `None` while the count is still loading
    pub peer_count: Option<u32>,
}

impl Default for ChainTuple {
    /// Pre-activation placeholder so downstream composition never blocks
    fn default() -> Self {
        ChainTuple {
            sync: SyncStatus::UNKNOWN,
            peer_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tuple_defaults() {
        let tuple = RawTuple::default();
        assert!(!tuple.process_alive);
        assert!(!tuple.api_connected);
        assert_eq!(tuple.download_progress, 0.0);
        assert!(!tuple.online);
        assert!(tuple.clock_sync);
    }

    #[test]
    fn test_chain_tuple_placeholder() {
        let tuple = ChainTuple::default();
        assert_eq!(tuple.sync, SyncStatus::UNKNOWN);
        assert_eq!(tuple.peer_count, None);
    }
}
