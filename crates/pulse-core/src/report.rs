//! Health report model - the engine's sole outbound artifact

use crate::SyncProgress;

/// Flat boolean summary of node health
///
/// Every field is derived synchronously from the latest signal tuples;
/// no field may carry stale data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    /// Internet connection is up
    pub internet: bool,
    /// Connected to the local node
    pub node_connected: bool,
    /// Local clock is synchronised
    pub clock_sync: bool,
    /// Currently downloading the client binary
    pub downloading: bool,
    /// Client still launching (API not yet connected)
    pub launching: bool,
    /// Connected to more than one peer
    pub peers: bool,
    /// Still synchronising blocks
    pub syncing: bool,
    /// Synchronised and no issues
    pub good: bool,
}

/// Download progress payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadPayload {
    /// Download progress as a rounded integer percentage
    pub sync_percentage: u32,
}

/// Block sync payload, present while the node reports sync detail
#[derive(Clone, Debug, PartialEq)]
pub struct SyncPayload {
    pub starting_block: u64,
    pub current_block: u64,
    pub highest_block: u64,
    pub sync_percentage: f64,
}

impl From<SyncProgress> for SyncPayload {
    fn from(progress: SyncProgress) -> Self {
        SyncPayload {
            starting_block: progress.starting_block,
            current_block: progress.current_block,
            highest_block: progress.highest_block,
            sync_percentage: progress.percentage(),
        }
    }
}

/// Optional payloads attached to the status flags
#[derive(Clone, Debug, PartialEq)]
pub struct HealthPayload {
    pub downloading: DownloadPayload,
    /// Present only while block sync detail is known and incomplete
    pub syncing: Option<SyncPayload>,
}

/// One health report: status flags plus their payloads
///
/// Consecutive reports delivered to a single subscriber are never equal
/// under this type's structural equality (the projector's dedup invariant).
#[derive(Clone, Debug, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub payload: HealthPayload,
}

impl HealthReport {
    pub fn is_good(&self) -> bool {
        self.status.good
    }
}
