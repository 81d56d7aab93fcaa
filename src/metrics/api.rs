//! Remote metrics artifacts and the HTTP source that fetches them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::model::{ClassificationReport, EpochRecord, MetricsSnapshot, PrCurvePoint};
use crate::http_client;

pub const EVALUATION_FILE: &str = "latest_evaluation.json";
pub const HISTORY_FILE: &str = "latest_metrics.json";

const MAX_ARTIFACT_BYTES: usize = 4 * 1024 * 1024;

/// Body of `latest_evaluation.json`.
///
/// Every field is optional on the wire; absence means "keep what the store
/// already has", never "clear it".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationArtifact {
    #[serde(default)]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(default)]
    pub confusion_matrix: Option<Vec<Vec<u64>>>,
    #[serde(default)]
    pub label_names: Option<Vec<String>>,
    #[serde(default)]
    pub pr_curve: Option<Vec<PrCurvePoint>>,
    #[serde(default, deserialize_with = "per_class_entries")]
    pub classification_report: Option<ClassificationReport>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Keep only the per-class objects of a report, skipping summary scalars
/// such as `"accuracy": 0.91`.
fn per_class_entries<'de, D>(deserializer: D) -> Result<Option<ClassificationReport>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<std::collections::BTreeMap<String, serde_json::Value>> =
        Option::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(label, value)| {
                serde_json::from_value(value)
                    .ok()
                    .map(|class| (label, class))
            })
            .collect()
    }))
}

/// Body of `latest_metrics.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryArtifact {
    #[serde(default)]
    pub metrics: Option<Vec<EpochRecord>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Failed to read body: {0}")]
    Body(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the sync scheduler gets its artifacts from.
pub trait MetricsSource: Send + Sync {
    fn evaluation(&self) -> Result<EvaluationArtifact, SyncError>;
    fn training_history(&self) -> Result<HistoryArtifact, SyncError>;
}

/// Fetches artifacts as static JSON files below a base URL.
#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    base_url: String,
}

impl HttpMetricsSource {
    /// `base_url` must already be normalized (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, SyncError> {
        let url = format!("{}/{file}", self.base_url);
        let response = match http_client::agent()
            .get(&url)
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(SyncError::Status(code)),
            Err(ureq::Error::Transport(err)) => return Err(SyncError::Transport(err.to_string())),
        };
        let body = http_client::read_body_string(response, MAX_ARTIFACT_BYTES)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MetricsSource for HttpMetricsSource {
    fn evaluation(&self) -> Result<EvaluationArtifact, SyncError> {
        self.get_json(EVALUATION_FILE)
    }

    fn training_history(&self) -> Result<HistoryArtifact, SyncError> {
        self.get_json(HISTORY_FILE)
    }
}
