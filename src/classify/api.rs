//! Inference server client: `/predict` and `/health`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::errors::ClassifyError;
use crate::http_client;

const MAX_PREDICT_RESPONSE_BYTES: usize = 1024 * 1024;
const MAX_HEALTH_RESPONSE_BYTES: usize = 64 * 1024;

/// Whether a response came from the trained model or the demo heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingMode {
    Demo,
    Real,
}

impl ServingMode {
    pub fn badge(self) -> &'static str {
        match self {
            Self::Demo => "Demo Mode",
            Self::Real => "Live Model",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

/// One entry of `predictions` in a `/predict` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionWire {
    #[serde(default)]
    pub text: Option<String>,
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionWire>,
    pub mode: ServingMode,
    #[serde(default)]
    pub model_dir: Option<String>,
}

/// A classification outcome as shown in the console and its history.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub text: String,
    pub label: String,
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
    pub latency_ms: u64,
    pub model: String,
    pub mode: ServingMode,
    pub timestamp: OffsetDateTime,
}

impl PredictionResult {
    /// Label probabilities, highest first.
    pub fn ranked_probabilities(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .probabilities
            .iter()
            .map(|(label, prob)| (label.as_str(), *prob))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl PredictResponse {
    /// Take the first prediction, stamped with the response mode and `captured_at`.
    pub fn into_result(
        self,
        submitted: &str,
        captured_at: OffsetDateTime,
    ) -> Result<PredictionResult, ClassifyError> {
        let mode = self.mode;
        let prediction = self
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::Malformed("response contained no predictions".into()))?;
        Ok(PredictionResult {
            text: prediction.text.unwrap_or_else(|| submitted.to_string()),
            label: prediction.label,
            confidence: prediction.confidence,
            probabilities: prediction.probabilities,
            latency_ms: prediction.latency_ms.max(0.0).round() as u64,
            model: prediction.model,
            mode,
            timestamp: captured_at,
        })
    }
}

/// `/health` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub mode: ServingMode,
    #[serde(default)]
    pub model_dir: Option<String>,
    #[serde(default)]
    pub uptime_seconds: f64,
}

/// Something that can classify text. The console talks to this seam so
/// tests can stand in for the network.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<PredictResponse, ClassifyError>;

    /// Probe the server without classifying anything.
    fn health(&self) -> Result<HealthStatus, ClassifyError>;

    /// Base URL shown in remediation messages.
    fn endpoint(&self) -> &str;
}

/// Classifier backed by the HTTP inference server.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    base_url: String,
}

impl HttpClassifier {
    /// `base_url` must already be normalized (see
    /// [`crate::settings::normalize_api_base_url`]).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, text: &str) -> Result<PredictResponse, ClassifyError> {
        let url = format!("{}/predict", self.base_url);
        let response = map_call(
            http_client::agent()
                .post(&url)
                .set("Accept", "application/json")
                .send_json(PredictRequest { text }),
        )?;
        parse_body(response, MAX_PREDICT_RESPONSE_BYTES)
    }

    fn health(&self) -> Result<HealthStatus, ClassifyError> {
        let url = format!("{}/health", self.base_url);
        let response = map_call(
            http_client::agent()
                .get(&url)
                .set("Accept", "application/json")
                .call(),
        )?;
        parse_body(response, MAX_HEALTH_RESPONSE_BYTES)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

fn map_call(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, ClassifyError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, _)) => Err(ClassifyError::Status(code)),
        Err(ureq::Error::Transport(err)) => Err(ClassifyError::Transport(err.to_string())),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<T, ClassifyError> {
    let body = http_client::read_body_string(response, max_bytes)
        .map_err(|err| ClassifyError::Malformed(err.to_string()))?;
    serde_json::from_str(&body).map_err(|err| ClassifyError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::stub;

    const PREDICT_BODY: &str = r#"{"predictions":[{"text":"NASA launches satellite","label":"Sci/Tech","confidence":0.91,"probabilities":{"World":0.03,"Sports":0.02,"Business":0.04,"Sci/Tech":0.91},"model":"demo-heuristic","latency_ms":3.6}],"mode":"demo"}"#;

    #[test]
    fn classify_parses_first_prediction() {
        let base = stub::serve(vec![("/predict", stub::json(PREDICT_BODY))]);
        let response = HttpClassifier::new(base).classify("NASA launches satellite").unwrap();
        let result = response
            .into_result("NASA launches satellite", OffsetDateTime::UNIX_EPOCH)
            .unwrap();
        assert_eq!(result.label, "Sci/Tech");
        assert_eq!(result.mode, ServingMode::Demo);
        assert_eq!(result.latency_ms, 4);
        assert_eq!(result.ranked_probabilities()[0], ("Sci/Tech", 0.91));
        assert_eq!(result.ranked_probabilities()[3], ("Sports", 0.02));
    }

    #[test]
    fn method_not_allowed_maps_to_status() {
        let base = stub::serve(vec![("/predict", stub::status(405, "Method Not Allowed"))]);
        let err = HttpClassifier::new(base).classify("hello").unwrap_err();
        assert_eq!(err, ClassifyError::Status(405));
    }

    #[test]
    fn server_error_maps_to_status() {
        let base = stub::serve(vec![("/predict", stub::status(500, "Internal Server Error"))]);
        let err = HttpClassifier::new(base).classify("hello").unwrap_err();
        assert_eq!(err, ClassifyError::Status(500));
    }

    #[test]
    fn unreachable_server_maps_to_transport() {
        let err = HttpClassifier::new(stub::unreachable())
            .classify("hello")
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Transport(_)));
    }

    #[test]
    fn non_json_success_is_malformed() {
        let base = stub::serve(vec![("/predict", stub::json("<html>ok</html>"))]);
        let err = HttpClassifier::new(base).classify("hello").unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }

    #[test]
    fn empty_predictions_are_malformed() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"predictions":[],"mode":"real"}"#).unwrap();
        let err = response
            .into_result("x", OffsetDateTime::UNIX_EPOCH)
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }

    #[test]
    fn missing_text_falls_back_to_submitted() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions":[{"label":"World","confidence":0.8}],"mode":"real"}"#,
        )
        .unwrap();
        let result = response
            .into_result("Summit talks resume", OffsetDateTime::UNIX_EPOCH)
            .unwrap();
        assert_eq!(result.text, "Summit talks resume");
        assert_eq!(result.mode, ServingMode::Real);
    }

    #[test]
    fn health_reports_mode() {
        let base = stub::serve(vec![(
            "/health",
            stub::json(r#"{"status":"ok","mode":"real","model_dir":"models/latest","uptime_seconds":12.5}"#),
        )]);
        let health = HttpClassifier::new(base).health().unwrap();
        assert_eq!(health.mode, ServingMode::Real);
        assert_eq!(health.model_dir.as_deref(), Some("models/latest"));
    }
}
