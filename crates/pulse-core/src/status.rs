//! Chain sync status and peer samples - raw inbound signal domains

/// Block-level sync progress as reported by the node API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncProgress {
    pub starting_block: u64,
    pub current_block: u64,
    pub highest_block: u64,
}

impl SyncProgress {
    pub fn new(starting_block: u64, current_block: u64, highest_block: u64) -> Self {
        SyncProgress {
            starting_block,
            current_block,
            highest_block,
        }
    }

    /// Percentage of the block span already processed
    /// INVARIANT: a zero block span counts as 0%, never a division fault
    pub fn percentage(&self) -> f64 {
        let span = self.highest_block.saturating_sub(self.starting_block);
        if span == 0 {
            return 0.0;
        }
        let done = self.current_block.saturating_sub(self.starting_block);
        done as f64 * 100.0 / span as f64
    }
}

/// Sync status of the chain
///
/// `Syncing(None)` is the "syncing, detail unknown" placeholder used before
/// the node API has reported a first real value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    /// Fully synced with the network
    NotSyncing,
    /// Still processing blocks
    Syncing(Option<SyncProgress>),
}

impl SyncStatus {
    /// Syncing with no block detail reported yet
    pub const UNKNOWN: SyncStatus = SyncStatus::Syncing(None);

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::NotSyncing)
    }

    /// Block progress, if the node has reported it
    pub fn progress(&self) -> Option<SyncProgress> {
        match self {
            SyncStatus::NotSyncing => None,
            SyncStatus::Syncing(progress) => *progress,
        }
    }
}

/// One peer-count observation
///
/// `Loading` means the API has not produced a count yet. It maps to "no
/// peer count" downstream and is distinct from `Count(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerSample {
    Loading,
    Count(u32),
}

impl PeerSample {
    pub fn count(&self) -> Option<u32> {
        match self {
            PeerSample::Loading => None,
            PeerSample::Count(n) => Some(*n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_percentage_midway() {
        let progress = SyncProgress::new(100, 550, 1000);
        assert!((progress.percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_zero_span() {
        let progress = SyncProgress::new(500, 500, 500);
        assert_eq!(progress.percentage(), 0.0);
    }

    #[test]
    fn test_unknown_is_syncing_without_progress() {
        assert!(!SyncStatus::UNKNOWN.is_synced());
        assert_eq!(SyncStatus::UNKNOWN.progress(), None);
    }

    #[test]
    fn test_peer_sample_loading_vs_zero() {
        assert_eq!(PeerSample::Loading.count(), None);
        assert_eq!(PeerSample::Count(0).count(), Some(0));
        assert_ne!(PeerSample::Loading, PeerSample::Count(0));
    }

    proptest! {
        #[test]
        fn prop_percentage_bounded(start in 0u64..1_000_000, len in 0u64..1_000_000, done in 0u64..1_000_000) {
            let current = start + done.min(len);
            let progress = SyncProgress::new(start, current, start + len);
            let pct = progress.percentage();
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
