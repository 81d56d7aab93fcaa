//! Value types shown on the overview page, plus the built-in demo values the
//! dashboard starts with.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Headline evaluation scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub accuracy: f64,
    pub f1_weighted: f64,
    pub f1_macro: f64,
    /// Matthews correlation coefficient, in `[-1, 1]`.
    pub mcc: f64,
}

/// One row of the training history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: u32,
    pub train_loss: f64,
    pub val_loss: f64,
    #[serde(alias = "train_accuracy")]
    pub train_acc: f64,
    #[serde(alias = "val_accuracy")]
    pub val_acc: f64,
    pub val_f1: f64,
}

/// One point of the precision/recall curve. Consumers assume recall is
/// non-decreasing along the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrCurvePoint {
    pub recall: f64,
    pub precision: f64,
}

/// Per-class scores from the evaluation report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    #[serde(alias = "f1-score")]
    pub f1: f64,
    #[serde(default)]
    pub support: u64,
}

/// Per-class report keyed by label name.
pub type ClassificationReport = BTreeMap<String, ClassReport>;

/// Square count matrix with one unique label per row/column.
///
/// The only way to build one is [`ConfusionMatrix::new`], which enforces
/// `rows.len() == labels.len() == row.len()` for every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    rows: Vec<Vec<u64>>,
}

/// Why a matrix/labels pair was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfusionMatrixError {
    #[error("{labels} labels for a matrix with {rows} rows")]
    LabelCount { labels: usize, rows: usize },
    #[error("row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("duplicate label {0:?}")]
    DuplicateLabel(String),
}

impl ConfusionMatrix {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<u64>>) -> Result<Self, ConfusionMatrixError> {
        if labels.len() != rows.len() {
            return Err(ConfusionMatrixError::LabelCount {
                labels: labels.len(),
                rows: rows.len(),
            });
        }
        if let Some((row, len)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != labels.len())
        {
            return Err(ConfusionMatrixError::RaggedRow {
                row,
                len,
                expected: labels.len(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = labels.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(ConfusionMatrixError::DuplicateLabel(dup.clone()));
        }
        Ok(Self { labels, rows })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Largest cell value, used to scale cell shading.
    pub fn max_count(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Fraction of row `row` that landed on the diagonal (per-class recall).
    pub fn row_recall(&self, row: usize) -> Option<f64> {
        let cells = self.rows.get(row)?;
        let total = cells.iter().fold(0u64, |acc, count| acc.saturating_add(*count));
        (total > 0).then(|| cells[row] as f64 / total as f64)
    }
}

/// Lifecycle state of a pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub name: String,
    pub status: StepStatus,
    pub duration: Option<String>,
}

pub(crate) mod demo {
    use super::*;

    pub(crate) fn metrics() -> MetricsSnapshot {
        MetricsSnapshot {
            accuracy: 0.9142,
            f1_weighted: 0.9138,
            f1_macro: 0.9131,
            mcc: 0.8856,
        }
    }

    pub(crate) fn history() -> Vec<EpochRecord> {
        [
            (1, 0.42, 0.31, 0.85, 0.89, 0.888),
            (2, 0.22, 0.25, 0.92, 0.91, 0.908),
            (3, 0.14, 0.24, 0.95, 0.914, 0.914),
        ]
        .into_iter()
        .map(
            |(epoch, train_loss, val_loss, train_acc, val_acc, val_f1)| EpochRecord {
                epoch,
                train_loss,
                val_loss,
                train_acc,
                val_acc,
                val_f1,
            },
        )
        .collect()
    }

    pub(crate) fn labels() -> Vec<String> {
        ["World", "Sports", "Business", "Sci/Tech"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub(crate) fn confusion() -> ConfusionMatrix {
        ConfusionMatrix {
            labels: labels(),
            rows: vec![
                vec![1780, 35, 52, 33],
                vec![22, 1868, 12, 18],
                vec![48, 18, 1752, 42],
                vec![30, 25, 38, 1827],
            ],
        }
    }

    pub(crate) fn pr_curve() -> Vec<PrCurvePoint> {
        [
            (0.0, 1.0),
            (0.2, 0.995),
            (0.4, 0.987),
            (0.6, 0.972),
            (0.8, 0.948),
            (0.9, 0.921),
            (0.95, 0.884),
            (1.0, 0.25),
        ]
        .into_iter()
        .map(|(recall, precision)| PrCurvePoint { recall, precision })
        .collect()
    }

    pub(crate) fn pipeline() -> Vec<PipelineStep> {
        [
            ("Data Ingestion", StepStatus::Success, Some("2m 14s")),
            ("Preprocessing", StepStatus::Success, Some("1m 38s")),
            ("Model Training", StepStatus::Success, Some("34m 12s")),
            ("Evaluation", StepStatus::Success, Some("2m 05s")),
            ("Model Registry", StepStatus::Running, None),
            ("Endpoint Deploy", StepStatus::Pending, None),
        ]
        .into_iter()
        .map(|(name, status, duration)| PipelineStep {
            name: name.to_string(),
            status,
            duration: duration.map(String::from),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn demo_confusion_satisfies_constructor_checks() {
        let demo = demo::confusion();
        let rebuilt = ConfusionMatrix::new(demo.labels().to_vec(), demo.rows().to_vec()).unwrap();
        assert_eq!(rebuilt, demo);
        assert_eq!(demo.max_count(), 1868);
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let err = ConfusionMatrix::new(labels(&["a"]), vec![vec![1, 0], vec![0, 1]]).unwrap_err();
        assert_eq!(err, ConfusionMatrixError::LabelCount { labels: 1, rows: 2 });
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = ConfusionMatrix::new(labels(&["a", "b"]), vec![vec![1, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, ConfusionMatrixError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let err =
            ConfusionMatrix::new(labels(&["a", "a"]), vec![vec![1, 0], vec![0, 1]]).unwrap_err();
        assert_eq!(err, ConfusionMatrixError::DuplicateLabel("a".into()));
    }

    #[test]
    fn row_recall_handles_empty_rows() {
        let matrix =
            ConfusionMatrix::new(labels(&["a", "b"]), vec![vec![3, 1], vec![0, 0]]).unwrap();
        assert_eq!(matrix.row_recall(0), Some(0.75));
        assert_eq!(matrix.row_recall(1), None);
        assert_eq!(matrix.row_recall(2), None);
    }

    #[test]
    fn row_recall_saturates_on_huge_counts() {
        let matrix = ConfusionMatrix::new(
            labels(&["a", "b"]),
            vec![vec![u64::MAX, u64::MAX], vec![0, 1]],
        )
        .unwrap();
        let recall = matrix.row_recall(0).unwrap();
        assert!((0.0..=1.0).contains(&recall));
        assert_eq!(matrix.row_recall(1), Some(1.0));
    }

    #[test]
    fn epoch_record_accepts_long_accuracy_keys() {
        let record: EpochRecord = serde_json::from_str(
            r#"{"epoch":2,"train_loss":0.2,"val_loss":0.25,"train_accuracy":0.9,"val_accuracy":0.91,"val_f1":0.9}"#,
        )
        .unwrap();
        assert_eq!(record.train_acc, 0.9);
        assert_eq!(record.val_acc, 0.91);
    }
}
