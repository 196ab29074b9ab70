//! Signal inputs - the seven inbound channels with documented defaults

use pulse_core::{PeerSample, PulseResult, SyncStatus};

use crate::Subject;

/// The seven inbound signal channels
///
/// Each subject is seeded with the signal's documented default, so every
/// subscription replays a value immediately and a source that has not
/// reported yet degrades to its default rather than stalling or failing.
/// Collaborators hold clones and publish into them; the engine subscribes.
#[derive(Clone)]
pub struct SignalInputs {
    /// Local client process is running (default: false)
    pub process_alive: Subject<bool>,
    /// API transport established (default: false)
    pub api_connected: Subject<bool>,
    /// Client binary download progress in [0, 1] (default: 0)
    pub download_progress: Subject<f64>,
    /// Internet connectivity (default: the platform-probed value)
    pub online: Subject<bool>,
    /// Wall clock agrees with network time (default: true, optimistic)
    pub clock_sync: Subject<bool>,
    /// Chain sync status (default: syncing, detail unknown)
    pub sync_status: Subject<SyncStatus>,
    /// Peer count (default: still loading)
    pub peer_count: Subject<PeerSample>,
}

impl SignalInputs {
    /// Create the input set, seeding `online` with the platform-probed
    /// connectivity
    pub fn new(online: bool) -> Self {
        SignalInputs {
            process_alive: Subject::new(false),
            api_connected: Subject::new(false),
            download_progress: Subject::new(0.0),
            online: Subject::new(online),
            clock_sync: Subject::new(true),
            sync_status: Subject::new(SyncStatus::UNKNOWN),
            peer_count: Subject::new(PeerSample::Loading),
        }
    }

    /// Build inputs from a connectivity probe result
    ///
    /// A probe that cannot run at all (host channel unavailable outside its
    /// expected runtime context) degrades to offline defaults; the engine
    /// still starts and reports an unhealthy status instead of refusing.
    pub fn from_connectivity(probe: PulseResult<bool>) -> Self {
        match probe {
            Ok(online) => SignalInputs::new(online),
            Err(err) => {
                tracing::warn!("connectivity probe unavailable, starting offline: {err}");
                SignalInputs::new(false)
            }
        }
    }

    /// Fully-defaulted inputs for runtimes with no host channel at all
    pub fn detached() -> Self {
        SignalInputs::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::PulseError;

    #[tokio::test]
    async fn test_defaults_replay_on_subscribe() {
        let inputs = SignalInputs::new(true);

        assert!(!inputs.process_alive.latest());
        assert!(!inputs.api_connected.latest());
        assert_eq!(inputs.download_progress.latest(), 0.0);
        assert!(inputs.online.latest());
        assert!(inputs.clock_sync.latest());
        assert_eq!(inputs.sync_status.latest(), SyncStatus::UNKNOWN);
        assert_eq!(inputs.peer_count.latest(), PeerSample::Loading);

        let mut clock = inputs.clock_sync.subscribe();
        assert_eq!(clock.recv().await, Some(true));
    }

    #[test]
    fn test_failed_probe_degrades_to_offline() {
        let inputs = SignalInputs::from_connectivity(Err(PulseError::HostChannelUnavailable(
            "not running under the host shell".into(),
        )));
        assert!(!inputs.online.latest());
    }

    #[test]
    fn test_detached_inputs_start_at_defaults() {
        let inputs = SignalInputs::detached();
        assert!(!inputs.online.latest());
        assert!(inputs.clock_sync.latest());
    }
}
