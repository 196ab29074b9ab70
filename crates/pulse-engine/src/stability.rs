//! Stability combinator - fan-in of the five coarse signals

use pulse_core::RawTuple;
use pulse_signal::{SignalInputs, Subject, Subscription};
use tokio::task::JoinHandle;

/// Fan-in of process-alive, api-connected, download-progress, online and
/// clock-sync into one multicast stream of `RawTuple`s
///
/// On every emission from any input the full tuple is recomputed from the
/// latest known value of the other four and published. No dedup happens at
/// this stage: each upstream emission produces exactly one downstream
/// emission. The stage never fails; the input contract already keeps error
/// signals out.
pub struct StabilityCombinator {
    output: Subject<RawTuple>,
    driver: JoinHandle<()>,
}

impl StabilityCombinator {
    /// Spawn the driver task
    ///
    /// The output subject is seeded from the inputs' current values, so a
    /// subscriber never waits for the first emission. Must be called inside
    /// a tokio runtime.
    pub fn spawn(inputs: &SignalInputs) -> Self {
        let initial = RawTuple {
            process_alive: inputs.process_alive.latest(),
            api_connected: inputs.api_connected.latest(),
            download_progress: inputs.download_progress.latest(),
            online: inputs.online.latest(),
            clock_sync: inputs.clock_sync.latest(),
        };
        let output = Subject::new(initial.clone());

        let driver = tokio::spawn(drive(
            initial,
            inputs.process_alive.subscribe(),
            inputs.api_connected.subscribe(),
            inputs.download_progress.subscribe(),
            inputs.online.subscribe(),
            inputs.clock_sync.subscribe(),
            output.clone(),
        ));

        StabilityCombinator { output, driver }
    }

    pub fn output(&self) -> &Subject<RawTuple> {
        &self.output
    }

    pub fn subscribe(&self) -> Subscription<RawTuple> {
        self.output.subscribe()
    }

    /// Stop the driver and end the output stream
    pub fn shutdown(&self) {
        self.driver.abort();
        self.output.close();
    }
}

impl Drop for StabilityCombinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[allow(clippy::too_many_arguments)]
async fn drive(
    mut latest: RawTuple,
    mut process_alive: Subscription<bool>,
    mut api_connected: Subscription<bool>,
    mut download_progress: Subscription<f64>,
    mut online: Subscription<bool>,
    mut clock_sync: Subscription<bool>,
    output: Subject<RawTuple>,
) {
    // Each subscription replays its current value up front; those replays
    // fold into `latest` like any other emission. A closed input disables
    // its branch; the stage keeps running on the survivors.
    let mut open = [true; 5];

    loop {
        tokio::select! {
            v = process_alive.recv(), if open[0] => match v {
                Some(value) => latest.process_alive = value,
                None => {
                    open[0] = false;
                    continue;
                }
            },
            v = api_connected.recv(), if open[1] => match v {
                Some(value) => latest.api_connected = value,
                None => {
                    open[1] = false;
                    continue;
                }
            },
            v = download_progress.recv(), if open[2] => match v {
                Some(value) => latest.download_progress = value,
                None => {
                    open[2] = false;
                    continue;
                }
            },
            v = online.recv(), if open[3] => match v {
                Some(value) => latest.online = value,
                None => {
                    open[3] = false;
                    continue;
                }
            },
            v = clock_sync.recv(), if open[4] => match v {
                Some(value) => latest.clock_sync = value,
                None => {
                    open[4] = false;
                    continue;
                }
            },
            else => break,
        }

        output.publish(latest.clone());
    }

    tracing::debug!("all stability inputs closed, combinator driver exiting");
}
