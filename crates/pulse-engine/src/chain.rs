//! Chain-status pipeline - activation gate and sync debounce

use std::time::Duration;

use pulse_core::{ChainTuple, PeerSample, SyncStatus};
use pulse_signal::{SignalInputs, Subject, Subscription};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Chain pipeline configuration
///
/// The window length is keyed on the incoming value's own declared state:
/// a fully-synced value breaks through with the zero window while
/// still-syncing values must stay quiet for the full window. The asymmetry
/// matters for flicker suppression during active syncing; do not collapse
/// the two into one constant.
#[derive(Clone, Debug)]
pub struct ChainPipelineConfig {
    /// Quiet window a still-syncing value must survive before delivery
    pub quiet_window: Duration,
    /// Window for fully-synced values; zero delivers immediately
    pub synced_window: Duration,
}

impl Default for ChainPipelineConfig {
    fn default() -> Self {
        ChainPipelineConfig {
            quiet_window: Duration::from_millis(2000),
            synced_window: Duration::ZERO,
        }
    }
}

impl ChainPipelineConfig {
    fn window_for(&self, status: &SyncStatus) -> Duration {
        if status.is_synced() {
            self.synced_window
        } else {
            self.quiet_window
        }
    }
}

/// Sync-status debounce plus peer-count pass-through
///
/// Does nothing until `api_connected` first becomes true; from then on it is
/// active for the rest of the session even if the API connection later
/// drops. Until activation (and until the first real emission afterwards)
/// subscribers see the placeholder tuple: syncing with unknown detail, peer
/// count still loading.
pub struct ChainPipeline {
    output: Subject<ChainTuple>,
    driver: JoinHandle<()>,
}

impl ChainPipeline {
    pub fn spawn(inputs: &SignalInputs) -> Self {
        Self::spawn_with_config(inputs, ChainPipelineConfig::default())
    }

    /// Spawn the driver task. Must be called inside a tokio runtime.
    pub fn spawn_with_config(inputs: &SignalInputs, config: ChainPipelineConfig) -> Self {
        let output = Subject::new(ChainTuple::default());

        let driver = tokio::spawn(drive(
            inputs.api_connected.subscribe(),
            inputs.sync_status.clone(),
            inputs.peer_count.clone(),
            output.clone(),
            config,
        ));

        ChainPipeline { output, driver }
    }

    pub fn output(&self) -> &Subject<ChainTuple> {
        &self.output
    }

    pub fn subscribe(&self) -> Subscription<ChainTuple> {
        self.output.subscribe()
    }

    /// Stop the driver, cancelling any pending debounce window, and end the
    /// output stream
    pub fn shutdown(&self) {
        self.driver.abort();
        self.output.close();
    }
}

impl Drop for ChainPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn drive(
    mut api_connected: Subscription<bool>,
    sync_status: Subject<SyncStatus>,
    peer_count: Subject<PeerSample>,
    output: Subject<ChainTuple>,
    config: ChainPipelineConfig,
) {
    // One-shot activation: wait for the first `true`. Not re-armed if the
    // connection later drops.
    loop {
        match api_connected.recv().await {
            Some(true) => break,
            Some(false) => continue,
            None => return,
        }
    }
    // The gate never re-arms, so release the subscription now; otherwise a
    // flapping connection would queue emissions nobody reads for the rest
    // of the session.
    drop(api_connected);
    tracing::debug!("api connected, chain pipeline active");

    // Subscribe only now, mirroring activation: the replayed values count
    // as first emissions of the active phase.
    let mut sync_sub = sync_status.subscribe();
    let mut peers_sub = peer_count.subscribe();
    let mut sync_open = true;
    let mut peers_open = true;

    let mut tuple = output.latest();
    // Pending still-syncing value awaiting its quiet window. The window is
    // a single re-armed timer: superseded values are discarded, never
    // delivered late.
    let mut pending: Option<SyncStatus> = None;
    let window = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(window);

    loop {
        tokio::select! {
            v = sync_sub.recv(), if sync_open => match v {
                Some(status) => {
                    let wait = config.window_for(&status);
                    if wait.is_zero() {
                        // Fully synced breaks through immediately and
                        // cancels any pending debounced delivery.
                        pending = None;
                        tuple.sync = status;
                        output.publish(tuple.clone());
                    } else {
                        // Trailing-edge debounce: every newer value re-arms
                        // the window from its own arrival.
                        pending = Some(status);
                        window.as_mut().reset(Instant::now() + wait);
                    }
                }
                None => sync_open = false,
            },
            v = peers_sub.recv(), if peers_open => match v {
                Some(sample) => {
                    tuple.peer_count = sample.count();
                    output.publish(tuple.clone());
                }
                None => peers_open = false,
            },
            () = window.as_mut(), if pending.is_some() => {
                if let Some(status) = pending.take() {
                    tuple.sync = status;
                    output.publish(tuple.clone());
                }
            }
            else => break,
        }
    }

    tracing::debug!("chain inputs closed, pipeline driver exiting");
}
