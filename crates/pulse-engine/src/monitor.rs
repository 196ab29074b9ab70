//! Health monitor - stage orchestration, per-subscriber dedup, teardown

use std::sync::Arc;

use parking_lot::Mutex;
use pulse_core::{ChainTuple, HealthReport, PulseError, PulseResult, RawTuple};
use pulse_signal::{SignalInputs, Subject, Subscription};
use tokio::task::JoinHandle;

use crate::{project, ChainPipeline, ChainPipelineConfig, StabilityCombinator};

/// Counters kept by the projection driver
#[derive(Clone, Debug, Default)]
pub struct MonitorStats {
    pub raw_emissions: u64,
    pub chain_emissions: u64,
    pub reports_published: u64,
}

/// The assembled health engine
///
/// Owns the stage driver tasks and the outbound report subject. Combination
/// work happens once per upstream emission regardless of subscriber count;
/// each subscriber carries its own dedup memory. `shutdown` (or drop) aborts
/// every driver and ends all streams, after which no callback fires.
pub struct HealthMonitor {
    stability: StabilityCombinator,
    chain: ChainPipeline,
    reports: Subject<HealthReport>,
    driver: JoinHandle<()>,
    stats: Arc<Mutex<MonitorStats>>,
}

impl HealthMonitor {
    pub fn spawn(inputs: &SignalInputs) -> Self {
        Self::spawn_with_config(inputs, ChainPipelineConfig::default())
    }

    /// Wire up the three stages. Must be called inside a tokio runtime.
    pub fn spawn_with_config(inputs: &SignalInputs, config: ChainPipelineConfig) -> Self {
        let stability = StabilityCombinator::spawn(inputs);
        let chain = ChainPipeline::spawn_with_config(inputs, config);

        let raw_sub = stability.subscribe();
        let chain_sub = chain.subscribe();
        let latest_raw = stability.output().latest();
        let latest_chain = chain.output().latest();

        // Seed the outbound subject so late subscribers always have a
        // report to replay, even before the first upstream emission.
        let reports = Subject::new(project(&latest_raw, &latest_chain));
        let stats = Arc::new(Mutex::new(MonitorStats::default()));

        let driver = tokio::spawn(drive(
            latest_raw,
            latest_chain,
            raw_sub,
            chain_sub,
            reports.clone(),
            Arc::clone(&stats),
        ));

        HealthMonitor {
            stability,
            chain,
            reports,
            driver,
            stats,
        }
    }

    /// Subscribe to the deduplicated report stream
    ///
    /// The current report is replayed immediately; after that the
    /// subscription only yields reports that differ structurally from the
    /// one it delivered last.
    pub fn subscribe(&self) -> PulseResult<HealthSubscription> {
        if self.reports.is_closed() {
            return Err(PulseError::MonitorClosed);
        }
        Ok(HealthSubscription {
            sub: self.reports.subscribe(),
            last: None,
        })
    }

    /// Snapshot of the most recent report
    pub fn latest(&self) -> HealthReport {
        self.reports.latest()
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats.lock().clone()
    }

    /// Tear the session down: abort every driver, cancel pending debounce
    /// timers and end all outbound streams
    pub fn shutdown(&self) {
        self.driver.abort();
        self.stability.shutdown();
        self.chain.shutdown();
        self.reports.close();
        tracing::debug!("health monitor shut down");
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn drive(
    mut latest_raw: RawTuple,
    mut latest_chain: ChainTuple,
    mut raw_sub: Subscription<RawTuple>,
    mut chain_sub: Subscription<ChainTuple>,
    reports: Subject<HealthReport>,
    stats: Arc<Mutex<MonitorStats>>,
) {
    let mut raw_open = true;
    let mut chain_open = true;

    loop {
        tokio::select! {
            v = raw_sub.recv(), if raw_open => match v {
                Some(tuple) => {
                    latest_raw = tuple;
                    stats.lock().raw_emissions += 1;
                }
                None => {
                    raw_open = false;
                    continue;
                }
            },
            v = chain_sub.recv(), if chain_open => match v {
                Some(tuple) => {
                    latest_chain = tuple;
                    stats.lock().chain_emissions += 1;
                }
                None => {
                    chain_open = false;
                    continue;
                }
            },
            else => break,
        }

        reports.publish(project(&latest_raw, &latest_chain));
        stats.lock().reports_published += 1;
    }

    tracing::debug!("upstream stages closed, projection driver exiting");
}

/// One consumer's view of the report stream, with its own dedup memory
pub struct HealthSubscription {
    sub: Subscription<HealthReport>,
    last: Option<HealthReport>,
}

impl HealthSubscription {
    /// Next report that differs from the last one delivered here
    ///
    /// `None` once the monitor has shut down and the queue is drained.
    pub async fn recv(&mut self) -> Option<HealthReport> {
        while let Some(report) = self.sub.recv().await {
            if self.last.as_ref() != Some(&report) {
                self.last = Some(report.clone());
                return Some(report);
            }
        }
        None
    }

    /// Already-queued distinct report, if any, without waiting
    pub fn try_recv(&mut self) -> Option<HealthReport> {
        while let Some(report) = self.sub.try_recv() {
            if self.last.as_ref() != Some(&report) {
                self.last = Some(report.clone());
                return Some(report);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{PeerSample, SyncStatus};

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    /// Drive every signal to its healthy value
    fn make_healthy(inputs: &SignalInputs) {
        inputs.process_alive.publish(true);
        inputs.api_connected.publish(true);
        inputs.clock_sync.publish(true);
        inputs.sync_status.publish(SyncStatus::NotSyncing);
        inputs.peer_count.publish(PeerSample::Count(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_good_scenario() {
        let inputs = SignalInputs::new(true);
        let monitor = HealthMonitor::spawn(&inputs);

        make_healthy(&inputs);
        settle().await;

        let report = monitor.latest();
        assert!(report.is_good());
        assert!(!report.status.downloading);
        assert!(!report.status.launching);
        assert!(!report.status.syncing);
        assert_eq!(report.payload.syncing, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_too_few_peers_is_unhealthy() {
        let inputs = SignalInputs::new(true);
        let monitor = HealthMonitor::spawn(&inputs);

        make_healthy(&inputs);
        inputs.peer_count.publish(PeerSample::Count(1));
        settle().await;

        let report = monitor.latest();
        assert!(!report.status.peers);
        assert!(!report.status.good);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_subscriber_dedup() {
        let inputs = SignalInputs::new(false);
        let monitor = HealthMonitor::spawn(&inputs);

        let mut sub = monitor.subscribe().unwrap();
        settle().await;
        // Replay plus the startup emissions collapse to one distinct report.
        assert!(sub.try_recv().is_some());
        assert!(sub.try_recv().is_none());

        // Two identical upstream emissions yield exactly one report.
        inputs.online.publish(true);
        inputs.online.publish(true);
        settle().await;

        let report = sub.try_recv().expect("one report for the change");
        assert!(report.status.internet);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_subscriber_replays_current_report() {
        let inputs = SignalInputs::new(true);
        let monitor = HealthMonitor::spawn(&inputs);

        make_healthy(&inputs);
        settle().await;

        // Attach after the reports were produced.
        let mut late = monitor.subscribe().unwrap();
        let report = late.recv().await.expect("immediate replay");
        assert!(report.is_good());

        // Each subscriber keeps independent dedup memory.
        let mut other = monitor.subscribe().unwrap();
        assert!(other.recv().await.unwrap().is_good());
    }

    #[tokio::test(start_paused = true)]
    async fn test_combination_happens_once_per_emission() {
        let inputs = SignalInputs::new(true);
        let monitor = HealthMonitor::spawn(&inputs);

        let _a = monitor.subscribe().unwrap();
        let _b = monitor.subscribe().unwrap();
        let _c = monitor.subscribe().unwrap();
        settle().await;

        let before = monitor.stats().reports_published;
        inputs.clock_sync.publish(false);
        settle().await;

        // One upstream emission, one projection, regardless of fan-out.
        assert_eq!(monitor.stats().reports_published, before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_all_callbacks() {
        let inputs = SignalInputs::new(true);
        let monitor = HealthMonitor::spawn(&inputs);
        let mut sub = monitor.subscribe().unwrap();
        settle().await;

        monitor.shutdown();
        inputs.process_alive.publish(true);
        settle().await;

        // Drain whatever was in flight; the stream then ends for good.
        while let Some(_report) = sub.recv().await {}
        assert!(matches!(monitor.subscribe(), Err(PulseError::MonitorClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_inputs_still_produce_a_report() {
        let inputs = SignalInputs::detached();
        let monitor = HealthMonitor::spawn(&inputs);
        settle().await;

        let report = monitor.latest();
        assert!(!report.status.good);
        assert!(report.status.launching);
        assert_eq!(report.payload.downloading.sync_percentage, 0);
    }
}
