//! Dashboard controller: owns the metrics store, the sync scheduler and the
//! classification console, and exposes the actions the UI can trigger.

mod background_jobs;
mod jobs;

use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use jobs::ControllerJobs;

use crate::classify::{ClassificationRequestController, Classifier, HttpClassifier};
use crate::egui_app::state::{ServerBadge, UiState};
use crate::egui_app::ui::style::StatusTone;
use crate::metrics::{HttpMetricsSource, MetricsSnapshotStore, MetricsSource, MetricsSyncScheduler};
use crate::settings::{Endpoints, METRICS_SYNC_PERIOD};

/// Backends the controller talks to.
pub struct DashboardSources {
    /// `None` keeps the demo metrics forever.
    pub metrics: Option<Arc<dyn MetricsSource>>,
    pub classifier: Arc<dyn Classifier>,
    pub sync_period: Duration,
}

impl DashboardSources {
    pub fn from_endpoints(endpoints: &Endpoints) -> Self {
        Self {
            metrics: endpoints
                .metrics_base
                .as_ref()
                .map(|base| Arc::new(HttpMetricsSource::new(base.clone())) as Arc<dyn MetricsSource>),
            classifier: Arc::new(HttpClassifier::new(endpoints.api_base.clone())),
            sync_period: METRICS_SYNC_PERIOD,
        }
    }
}

pub struct DashboardController {
    pub ui: UiState,
    store: MetricsSnapshotStore,
    console: ClassificationRequestController,
    classifier: Arc<dyn Classifier>,
    jobs: ControllerJobs,
    scheduler: Option<MetricsSyncScheduler>,
    shut_down: bool,
}

impl DashboardController {
    /// Build the controller and start background work: the metrics sync (when
    /// a source is configured) and an initial health probe.
    pub fn new(sources: DashboardSources) -> Self {
        let mut ui = UiState::default();
        let jobs = ControllerJobs::new();
        let scheduler = match sources.metrics {
            Some(source) => {
                let (tx, rx) = mpsc::channel();
                jobs.forward_sync_outcomes(rx);
                ui.status.set("Syncing metrics", StatusTone::Busy);
                Some(MetricsSyncScheduler::start(source, sources.sync_period, tx))
            }
            None => {
                tracing::info!("No metrics URL configured; showing demo metrics");
                None
            }
        };
        let mut controller = Self {
            ui,
            store: MetricsSnapshotStore::with_demo_data(),
            console: ClassificationRequestController::new(Arc::clone(&sources.classifier)),
            classifier: sources.classifier,
            jobs,
            scheduler,
            shut_down: false,
        };
        controller.check_server();
        controller
    }

    pub fn store(&self) -> &MetricsSnapshotStore {
        &self.store
    }

    pub fn console(&self) -> &ClassificationRequestController {
        &self.console
    }

    pub fn is_syncing(&self) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(MetricsSyncScheduler::is_running)
    }

    /// Start a `/health` probe; a probe already in flight is reused.
    pub fn check_server(&mut self) {
        if self.shut_down {
            return;
        }
        if self.jobs.begin_health_check(Arc::clone(&self.classifier)) {
            self.ui.server = ServerBadge::Checking;
        }
    }

    pub fn set_console_input(&mut self, text: String, now: Instant) {
        self.console.set_input(text, now);
    }

    pub fn classify_now(&mut self) {
        self.console.classify_now();
    }

    pub fn use_sample(&mut self, text: &str) {
        self.console.use_sample(text);
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    /// Whether the UI should keep repainting at a short interval.
    pub fn has_pending_work(&self) -> bool {
        self.console.is_loading() || self.jobs.health_check_in_progress
    }

    /// Earliest instant at which [`Self::poll_background_jobs`] has timed work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.console.next_deadline()
    }

    /// Stop the sync thread and the console. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        self.console.shutdown();
        tracing::info!("Dashboard controller shut down");
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifyError, HealthStatus, PredictResponse, ServingMode};
    use crate::metrics::{EvaluationArtifact, HistoryArtifact, SyncError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct OfflineClassifier;

    impl Classifier for OfflineClassifier {
        fn classify(&self, _text: &str) -> Result<PredictResponse, ClassifyError> {
            Err(ClassifyError::Transport("connection refused".into()))
        }

        fn health(&self) -> Result<HealthStatus, ClassifyError> {
            Err(ClassifyError::Transport("connection refused".into()))
        }

        fn endpoint(&self) -> &str {
            "http://localhost:8000"
        }
    }

    struct DemoClassifier;

    impl Classifier for DemoClassifier {
        fn classify(&self, text: &str) -> Result<PredictResponse, ClassifyError> {
            let body = format!(
                r#"{{"predictions":[{{"text":"{text}","label":"Business","confidence":0.8,"probabilities":{{"Business":0.8}},"model":"demo","latency_ms":1}}],"mode":"real"}}"#
            );
            serde_json::from_str(&body).map_err(|err| ClassifyError::Malformed(err.to_string()))
        }

        fn health(&self) -> Result<HealthStatus, ClassifyError> {
            Ok(HealthStatus {
                status: "ok".into(),
                mode: ServingMode::Demo,
                model_dir: None,
                uptime_seconds: 1.0,
            })
        }

        fn endpoint(&self) -> &str {
            "http://localhost:8000"
        }
    }

    struct StaticMetrics;

    impl MetricsSource for StaticMetrics {
        fn evaluation(&self) -> Result<EvaluationArtifact, SyncError> {
            Ok(serde_json::from_str(
                r#"{"metrics":{"accuracy":0.75,"f1_weighted":0.7,"f1_macro":0.7,"mcc":0.6}}"#,
            )?)
        }

        fn training_history(&self) -> Result<HistoryArtifact, SyncError> {
            Err(SyncError::Status(404))
        }
    }

    #[derive(Default)]
    struct FailingMetrics {
        calls: AtomicUsize,
    }

    impl MetricsSource for FailingMetrics {
        fn evaluation(&self) -> Result<EvaluationArtifact, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncError::Status(503))
        }

        fn training_history(&self) -> Result<HistoryArtifact, SyncError> {
            Err(SyncError::Status(503))
        }
    }

    /// Answers predictions at once but takes a while to report `/health`.
    struct SlowHealthClassifier;

    impl Classifier for SlowHealthClassifier {
        fn classify(&self, text: &str) -> Result<PredictResponse, ClassifyError> {
            DemoClassifier.classify(text)
        }

        fn health(&self) -> Result<HealthStatus, ClassifyError> {
            thread::sleep(Duration::from_millis(200));
            Err(ClassifyError::Transport("timed out".into()))
        }

        fn endpoint(&self) -> &str {
            "http://localhost:8000"
        }
    }

    fn poll_until(
        controller: &mut DashboardController,
        mut done: impl FnMut(&DashboardController) -> bool,
    ) {
        for _ in 0..100 {
            controller.poll_background_jobs(Instant::now());
            if done(controller) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("condition not reached");
    }

    #[test]
    fn without_metrics_source_store_stays_demo() {
        let mut controller = DashboardController::new(DashboardSources {
            metrics: None,
            classifier: Arc::new(OfflineClassifier),
            sync_period: Duration::from_secs(60),
        });
        assert!(!controller.is_syncing());
        poll_until(&mut controller, |c| c.ui.server == ServerBadge::Offline);
        assert!(controller.store().is_demo());
    }

    #[test]
    fn sync_outcome_is_merged_into_store() {
        let mut controller = DashboardController::new(DashboardSources {
            metrics: Some(Arc::new(StaticMetrics)),
            classifier: Arc::new(DemoClassifier),
            sync_period: Duration::from_secs(60),
        });
        poll_until(&mut controller, |c| !c.store().is_demo());
        assert_eq!(controller.store().metrics().accuracy, 0.75);
        assert_eq!(controller.store().history().len(), 3);
    }

    #[test]
    fn failed_sync_is_not_shown_in_status_bar() {
        let metrics = Arc::new(FailingMetrics::default());
        let mut controller = DashboardController::new(DashboardSources {
            metrics: Some(metrics.clone() as Arc<dyn MetricsSource>),
            classifier: Arc::new(DemoClassifier),
            sync_period: Duration::from_secs(60),
        });
        let text_before = controller.ui.status.text.clone();
        let badge_before = controller.ui.status.badge_label.clone();
        poll_until(&mut controller, |_| metrics.calls.load(Ordering::SeqCst) > 0);
        for _ in 0..10 {
            thread::sleep(Duration::from_millis(10));
            controller.poll_background_jobs(Instant::now());
        }
        assert_eq!(controller.ui.status.text, text_before);
        assert_eq!(controller.ui.status.badge_label, badge_before);
        assert!(controller.store().is_demo());
    }

    #[test]
    fn late_health_result_does_not_override_prediction_mode() {
        let mut controller = DashboardController::new(DashboardSources {
            metrics: None,
            classifier: Arc::new(SlowHealthClassifier),
            sync_period: Duration::from_secs(60),
        });
        assert_eq!(controller.ui.server, ServerBadge::Checking);
        controller.use_sample("Oil prices climb");
        poll_until(&mut controller, |c| c.console().result().is_some());
        assert_eq!(controller.ui.server, ServerBadge::Online(ServingMode::Real));
        poll_until(&mut controller, |c| !c.has_pending_work());
        assert_eq!(controller.ui.server, ServerBadge::Online(ServingMode::Real));

        controller.check_server();
        poll_until(&mut controller, |c| !c.has_pending_work());
        assert_eq!(controller.ui.server, ServerBadge::Offline);
    }

    #[test]
    fn prediction_updates_server_badge() {
        let mut controller = DashboardController::new(DashboardSources {
            metrics: None,
            classifier: Arc::new(DemoClassifier),
            sync_period: Duration::from_secs(60),
        });
        poll_until(&mut controller, |c| {
            c.ui.server == ServerBadge::Online(ServingMode::Demo)
        });
        controller.use_sample("Oil prices climb");
        poll_until(&mut controller, |c| c.console().result().is_some());
        assert_eq!(controller.ui.server, ServerBadge::Online(ServingMode::Real));
    }

    #[test]
    fn shutdown_is_idempotent_and_stops_sync() {
        let mut controller = DashboardController::new(DashboardSources {
            metrics: Some(Arc::new(StaticMetrics)),
            classifier: Arc::new(OfflineClassifier),
            sync_period: Duration::from_millis(20),
        });
        controller.shutdown();
        controller.shutdown();
        assert!(!controller.is_syncing());
        assert!(!controller.poll_background_jobs(Instant::now()));
    }
}
