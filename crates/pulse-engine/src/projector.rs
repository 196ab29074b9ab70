//! Health projector - derive a report from the latest signal tuples

use pulse_core::{
    ChainTuple, DownloadPayload, HealthPayload, HealthReport, HealthStatus, RawTuple, SyncPayload,
};

/// Derive a `HealthReport` from the latest stability and chain tuples
///
/// Total over its input domain: every combination of tuples maps to a
/// report, never an error. Unhealthy state is data (`good = false`), not an
/// exception.
pub fn project(raw: &RawTuple, chain: &ChainTuple) -> HealthReport {
    let is_downloading = raw.online && raw.download_progress > 0.0 && !raw.process_alive;
    let node_connected = !is_downloading && raw.api_connected && raw.process_alive;
    let is_no_peers = match chain.peer_count {
        None => true,
        Some(n) => n <= 1,
    };
    let is_sync_complete = chain.sync.is_synced();
    let good =
        is_sync_complete && !is_no_peers && raw.clock_sync && node_connected && raw.online;

    let status = HealthStatus {
        internet: raw.online,
        node_connected,
        clock_sync: raw.clock_sync,
        downloading: is_downloading,
        launching: !raw.api_connected,
        peers: !is_no_peers,
        syncing: !is_sync_complete,
        good,
    };

    let payload = HealthPayload {
        downloading: DownloadPayload {
            sync_percentage: (raw.download_progress * 100.0).round() as u32,
        },
        syncing: chain.sync.progress().map(SyncPayload::from),
    };

    HealthReport { status, payload }
}
