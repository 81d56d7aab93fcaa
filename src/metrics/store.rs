use super::api::{EvaluationArtifact, HistoryArtifact};
use super::model::{
    ClassificationReport, ConfusionMatrix, EpochRecord, MetricsSnapshot, PipelineStep,
    PrCurvePoint, demo,
};
use crate::timefmt;

/// Artifacts retrieved by one sync tick. `None` means that fetch failed.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub evaluation: Option<EvaluationArtifact>,
    pub history: Option<HistoryArtifact>,
}

/// Which store fields a merge replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub metrics: bool,
    pub confusion: bool,
    pub pr_curve: bool,
    pub report: bool,
    pub history: bool,
    pub timestamp: bool,
}

impl MergeReport {
    pub fn any(&self) -> bool {
        self.metrics
            || self.confusion
            || self.pr_curve
            || self.report
            || self.history
            || self.timestamp
    }
}

/// Best-known dashboard state.
///
/// Starts out with demo values. Only [`MetricsSnapshotStore::merge`] mutates
/// it, and every field it touches is replaced wholesale.
#[derive(Debug, Clone)]
pub struct MetricsSnapshotStore {
    metrics: MetricsSnapshot,
    history: Vec<EpochRecord>,
    confusion: ConfusionMatrix,
    pr_curve: Vec<PrCurvePoint>,
    report: ClassificationReport,
    pipeline: Vec<PipelineStep>,
    model_name: Option<String>,
    last_updated: String,
    remote_merges: u64,
}

impl Default for MetricsSnapshotStore {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

impl MetricsSnapshotStore {
    pub fn with_demo_data() -> Self {
        Self {
            metrics: demo::metrics(),
            history: demo::history(),
            confusion: demo::confusion(),
            pr_curve: demo::pr_curve(),
            report: ClassificationReport::new(),
            pipeline: demo::pipeline(),
            model_name: None,
            last_updated: timefmt::display_datetime(timefmt::now_local()),
            remote_merges: 0,
        }
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    pub fn history(&self) -> &[EpochRecord] {
        &self.history
    }

    pub fn confusion(&self) -> &ConfusionMatrix {
        &self.confusion
    }

    pub fn pr_curve(&self) -> &[PrCurvePoint] {
        &self.pr_curve
    }

    pub fn classification_report(&self) -> &ClassificationReport {
        &self.report
    }

    pub fn pipeline(&self) -> &[PipelineStep] {
        &self.pipeline
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    /// True until a sync has replaced at least one field.
    pub fn is_demo(&self) -> bool {
        self.remote_merges == 0
    }

    /// Apply one sync tick's artifacts.
    ///
    /// Present fields replace the stored value; absent fields and failed
    /// fetches leave it untouched.
    pub fn merge(&mut self, outcome: SyncOutcome) -> MergeReport {
        let mut report = MergeReport::default();
        if let Some(evaluation) = outcome.evaluation {
            self.merge_evaluation(evaluation, &mut report);
        }
        if let Some(rows) = outcome.history.and_then(|history| history.metrics) {
            self.history = rows;
            report.history = true;
        }
        if report.any() {
            self.remote_merges += 1;
        }
        report
    }

    fn merge_evaluation(&mut self, artifact: EvaluationArtifact, report: &mut MergeReport) {
        let EvaluationArtifact {
            metrics,
            confusion_matrix,
            label_names,
            pr_curve,
            classification_report,
            model_name,
            timestamp,
        } = artifact;

        if confusion_matrix.is_some() || label_names.is_some() {
            let labels = label_names.unwrap_or_else(|| self.confusion.labels().to_vec());
            let rows = confusion_matrix.unwrap_or_else(|| self.confusion.rows().to_vec());
            match ConfusionMatrix::new(labels, rows) {
                Ok(matrix) => {
                    report.confusion = matrix != self.confusion;
                    self.confusion = matrix;
                }
                Err(err) => {
                    tracing::warn!("Keeping previous confusion matrix; update rejected: {err}");
                }
            }
        }
        if let Some(metrics) = metrics {
            self.metrics = metrics;
            report.metrics = true;
        }
        if let Some(points) = pr_curve {
            self.pr_curve = points;
            report.pr_curve = true;
        }
        if let Some(classes) = classification_report {
            self.report = classes;
            report.report = true;
        }
        if let Some(name) = model_name {
            self.model_name = Some(name);
        }
        if let Some(raw) = timestamp {
            self.last_updated = match timefmt::parse_timestamp(&raw) {
                Some(parsed) => timefmt::display_datetime(parsed),
                None => raw,
            };
            report.timestamp = true;
        }
    }
}
