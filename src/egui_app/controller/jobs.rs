use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::classify::{Classifier, ClassifyError, HealthStatus};
use crate::metrics::SyncOutcome;

/// Results delivered to the UI thread from background work.
#[derive(Debug)]
pub(crate) enum JobMessage {
    MetricsSynced(SyncOutcome),
    HealthChecked(Result<HealthStatus, ClassifyError>),
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pub(super) health_check_in_progress: bool,
    /// A prediction reported the server mode while the probe was running.
    pub(super) health_superseded: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            health_check_in_progress: false,
            health_superseded: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    /// Relay scheduler outcomes onto the shared message channel.
    pub(super) fn forward_sync_outcomes(&self, rx: Receiver<SyncOutcome>) {
        let tx = self.message_tx.clone();
        let spawned = thread::Builder::new()
            .name("metrics-sync-forward".into())
            .spawn(move || {
                while let Ok(outcome) = rx.recv() {
                    if tx.send(JobMessage::MetricsSynced(outcome)).is_err() {
                        break;
                    }
                }
            });
        if let Err(err) = spawned {
            tracing::warn!("Failed to start metrics sync forwarder: {err}");
        }
    }

    /// Probe `/health` unless a probe is already running.
    pub(super) fn begin_health_check(&mut self, classifier: Arc<dyn Classifier>) -> bool {
        if self.health_check_in_progress {
            return false;
        }
        let tx = self.message_tx.clone();
        let spawned = thread::Builder::new()
            .name("health-check".into())
            .spawn(move || {
                let _ = tx.send(JobMessage::HealthChecked(classifier.health()));
            });
        match spawned {
            Ok(_) => {
                self.health_check_in_progress = true;
                self.health_superseded = false;
                true
            }
            Err(err) => {
                tracing::warn!("Failed to start health check: {err}");
                false
            }
        }
    }
}
