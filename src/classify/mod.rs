//! Interactive classification console: HTTP client, request controller and
//! result history.

pub mod api;
mod controller;
mod errors;
mod history;

pub use api::{
    Classifier, HealthStatus, HttpClassifier, PredictResponse, PredictionResult, ServingMode,
};
pub use controller::{AutoClassify, ClassificationRequestController};
pub use errors::{ClassifyError, remediation_message};
pub use history::PredictionHistoryLog;

/// Prompts offered as one-click samples in the console.
pub const SAMPLE_PROMPTS: [&str; 6] = [
    "Apple announces new M4 chip with revolutionary AI capabilities for MacBook Pro",
    "The Lakers defeated the Celtics 112-108 in overtime thriller at Staples Center",
    "Wall Street rallies as Federal Reserve holds interest rates steady for third quarter",
    "UN Security Council votes on new sanctions against North Korea amid nuclear tensions",
    "SpaceX successfully launches 60 Starlink satellites into orbit from Cape Canaveral",
    "Amazon reports record quarterly revenue of $170 billion, stock surges 8% after hours",
];
