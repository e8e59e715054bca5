//! Scan orchestration: one dispatch loop, a bounded pool of host jobs.
//!
//! Addresses are submitted in range order and complete unordered under an
//! `Arc<Semaphore>` concurrency budget. Cancellation is cooperative and
//! coarse: `stop()` halts submission, in-flight jobs run to completion.
//! Every executed job bumps the shared progress counter and emits exactly
//! one step event; the run ends with a single terminal event.

use crate::classify::{Classifier, ProbeConfig};
use crate::driver;
use crate::error::CliError;
use crate::net::Prober;
use crate::persist::ResultStore;
use crate::types::{AddrRange, DeviceTypeId};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Everything a scan needs to run.
pub struct ScanRequest {
    pub range: AddrRange,
    pub output_dir: PathBuf,
    pub include_localhost: bool,
    pub ignore_unknown: bool,
    /// Families whose results are kept; everything else is discarded
    /// after classification.
    pub selected: HashSet<DeviceTypeId>,
    pub concurrency: usize,
    pub probes: ProbeConfig,
}

impl ScanRequest {
    /// Total job count, the denominator for progress reporting.
    pub fn steps_total(&self) -> usize {
        self.range.len() as usize + usize::from(self.include_localhost)
    }
}

/// Lifecycle of a scan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Running,
    Cancelling,
    Completed,
    Cancelled,
}

/// How a finished scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed,
    Cancelled,
}

/// Progress and termination notifications.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// One job finished (alive or not).
    Step { done: usize, total: usize },
    /// The scan is over; no further events follow.
    Finished {
        outcome: ScanOutcome,
        elapsed: Duration,
        hosts_found: usize,
    },
}

/// Final accounting, also carried by the terminal event.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub outcome: ScanOutcome,
    pub elapsed: Duration,
    pub hosts_found: usize,
    pub result_dir: PathBuf,
}

/// A single scan run with cooperative cancellation.
pub struct ScanTask {
    request: ScanRequest,
    prober: Arc<dyn Prober>,
    stop: Arc<AtomicBool>,
    state: Arc<Mutex<ScanState>>,
}

/// Shared by [`ScanTask::stop`] and [`StopHandle::stop`] so both entry
/// points drive the same state transition.
fn request_stop(stop: &AtomicBool, state: &Mutex<ScanState>) {
    stop.store(true, Ordering::SeqCst);
    let mut state = state.lock().unwrap();
    if *state == ScanState::Running {
        *state = ScanState::Cancelling;
    }
}

impl ScanTask {
    pub fn new(request: ScanRequest, prober: Arc<dyn Prober>) -> Self {
        Self {
            request,
            prober,
            stop: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(ScanState::Idle)),
        }
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap()
    }

    /// Handle for cancelling the scan from another task.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
            state: Arc::clone(&self.state),
        }
    }

    /// Request cancellation: no new jobs start, running jobs finish.
    pub fn stop(&self) {
        request_stop(&self.stop, &self.state);
    }

    /// Run the scan to completion (or cancellation), emitting events as
    /// jobs finish.
    pub async fn run(&self, events: UnboundedSender<ScanEvent>) -> Result<ScanSummary, CliError> {
        let store = Arc::new(ResultStore::create(&self.request.output_dir)?);
        let result_dir = store.dir().to_path_buf();
        *self.state.lock().unwrap() = ScanState::Running;

        let total = self.request.steps_total();
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.request.concurrency.max(1)));
        let steps_done = Arc::new(AtomicUsize::new(0));
        let hosts_found = Arc::new(AtomicUsize::new(0));
        let classifier = Arc::new(Classifier::new(self.request.probes.clone()));

        // localhost goes last, after the whole range
        let addresses = self
            .request
            .range
            .iter()
            .map(|addr| addr.to_string())
            .chain(
                self.request
                    .include_localhost
                    .then(|| "127.0.0.1".to_string()),
            );

        stream::iter(addresses)
            .map(|address| {
                let semaphore = Arc::clone(&semaphore);
                let stop = Arc::clone(&self.stop);
                let steps_done = Arc::clone(&steps_done);
                let hosts_found = Arc::clone(&hosts_found);
                let classifier = Arc::clone(&classifier);
                let store = Arc::clone(&store);
                let prober = Arc::clone(&self.prober);
                let events = events.clone();
                let probes = self.request.probes.clone();
                let selected = self.request.selected.clone();
                let ignore_unknown = self.request.ignore_unknown;

                async move {
                    let _permit = semaphore.acquire_owned().await.unwrap();
                    if stop.load(Ordering::SeqCst) {
                        // cancelled before this job started; skip silently
                        return;
                    }

                    if prober.probe(&address).await {
                        let device_type = classifier.classify(&address).await;
                        debug!(%address, %device_type, "host is up");

                        if ignore_unknown && device_type == DeviceTypeId::Unknown {
                            debug!(%address, "discarding unknown device");
                        } else if !selected.contains(&device_type) {
                            debug!(%address, %device_type, "family deselected, discarding");
                        } else {
                            let mut driver = driver::create(device_type, &address, &probes);
                            driver.populate().await;
                            let record = driver.into_record();
                            match store.write_host(&record) {
                                Ok(_) => {
                                    hosts_found.fetch_add(1, Ordering::SeqCst);
                                }
                                Err(err) => {
                                    error!(%address, %err, "could not persist host record");
                                }
                            }
                        }
                    }

                    let done = steps_done.fetch_add(1, Ordering::SeqCst) + 1;
                    let _ = events.send(ScanEvent::Step { done, total });
                }
            })
            .buffer_unordered(self.request.concurrency.max(1))
            .collect::<Vec<()>>()
            .await;

        let elapsed = started.elapsed();
        let outcome = if self.stop.load(Ordering::SeqCst) {
            ScanOutcome::Cancelled
        } else {
            ScanOutcome::Completed
        };
        *self.state.lock().unwrap() = match outcome {
            ScanOutcome::Completed => ScanState::Completed,
            ScanOutcome::Cancelled => ScanState::Cancelled,
        };

        let found = hosts_found.load(Ordering::SeqCst);
        info!(?outcome, hosts_found = found, ?elapsed, "scan finished");
        let _ = events.send(ScanEvent::Finished {
            outcome,
            elapsed,
            hosts_found: found,
        });

        Ok(ScanSummary {
            outcome,
            elapsed,
            hosts_found: found,
            result_dir,
        })
    }
}

/// Clonable cancellation handle.
#[derive(Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
    state: Arc<Mutex<ScanState>>,
}

impl StopHandle {
    pub fn stop(&self) {
        request_stop(&self.stop, &self.state);
    }
}
