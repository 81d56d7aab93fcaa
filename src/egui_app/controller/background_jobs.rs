use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use super::DashboardController;
use super::jobs::JobMessage;
use crate::classify::{ClassifyError, HealthStatus};
use crate::egui_app::state::ServerBadge;
use crate::egui_app::ui::style::StatusTone;
use crate::metrics::SyncOutcome;

impl DashboardController {
    /// Drain finished background work and advance the console.
    ///
    /// Returns `true` when anything visible changed.
    pub fn poll_background_jobs(&mut self, now: Instant) -> bool {
        if self.shut_down {
            return false;
        }
        let mut changed = false;
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            changed = true;
            match message {
                JobMessage::MetricsSynced(outcome) => self.apply_sync_outcome(outcome),
                JobMessage::HealthChecked(result) => self.apply_health(result),
            }
        }
        if self.console.poll(now) {
            changed = true;
            if let Some(result) = self.console.result() {
                self.ui.server = ServerBadge::Online(result.mode);
                self.jobs.health_superseded = self.jobs.health_check_in_progress;
            }
        }
        changed
    }

    fn apply_sync_outcome(&mut self, outcome: SyncOutcome) {
        let report = self.store.merge(outcome);
        if report.any() {
            self.ui.status.set(
                format!("Metrics synced (updated {})", self.store.last_updated()),
                StatusTone::Info,
            );
        }
    }

    fn apply_health(&mut self, result: Result<HealthStatus, ClassifyError>) {
        self.jobs.health_check_in_progress = false;
        if std::mem::take(&mut self.jobs.health_superseded) {
            tracing::debug!("Ignoring health result older than the latest prediction");
            return;
        }
        match result {
            Ok(health) => {
                tracing::info!(
                    "Inference server {} in {:?} mode (up {:.0}s)",
                    health.status,
                    health.mode,
                    health.uptime_seconds
                );
                self.ui.server = ServerBadge::Online(health.mode);
            }
            Err(err) => {
                tracing::warn!("Health check failed: {err}");
                self.ui.server = ServerBadge::Offline;
            }
        }
    }
}
