//! Remote training/evaluation metrics: data model, snapshot store and the
//! background sync that keeps it fresh.

pub mod api;
mod model;
mod store;
mod sync;

pub use api::{EvaluationArtifact, HistoryArtifact, HttpMetricsSource, MetricsSource, SyncError};
pub use model::{
    ClassReport, ClassificationReport, ConfusionMatrix, ConfusionMatrixError, EpochRecord,
    MetricsSnapshot, PipelineStep, PrCurvePoint, StepStatus,
};
pub use store::{MergeReport, MetricsSnapshotStore, SyncOutcome};
pub use sync::{MetricsSyncScheduler, run_tick};
