use thiserror::Error;

use crate::settings::API_URL_ENV;

/// Why a classification attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The server could not be reached at all (refused, DNS, timeout).
    #[error("Network error: {0}")]
    Transport(String),
    #[error("API returned {0}")]
    Status(u16),
    /// A success status whose body was not a usable prediction.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Operator-facing message for a failed request against `api_base`.
pub fn remediation_message(err: &ClassifyError, api_base: &str) -> String {
    match err {
        ClassifyError::Transport(_) => format!(
            "Cannot reach the classification API at {api_base}. Start the inference server \
             locally (uvicorn src.serving.api:app --port 8000) or point the dashboard at a \
             running server with the `api_url` config key or {API_URL_ENV}."
        ),
        ClassifyError::Status(405) => format!(
            "API returned 405 Method Not Allowed. The API base URL ({api_base}) probably \
             already includes an endpoint path or points at the wrong service; configure \
             the server root, e.g. http://localhost:8000."
        ),
        ClassifyError::Status(code) => format!("API returned {code}"),
        ClassifyError::Malformed(detail) => {
            format!("The API response could not be parsed: {detail}")
        }
    }
}
