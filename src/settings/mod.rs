//! Persisted dashboard settings and endpoint resolution.

mod errors;
mod io;
mod types;
mod urls;

pub use errors::ConfigError;
pub use io::{CONFIG_FILE_NAME, config_path, load_from_path, load_or_default, save, save_to_path};
pub use types::{DashboardSettings, Endpoints};
pub use urls::{DEFAULT_API_URL, normalize_api_base_url, normalize_metrics_base_url};

use std::time::Duration;

/// Environment variable overriding `metrics_url`.
pub const METRICS_URL_ENV: &str = "OPSBOARD_METRICS_URL";
/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "OPSBOARD_API_URL";

/// Period between metrics sync ticks.
pub const METRICS_SYNC_PERIOD: Duration = Duration::from_secs(60);
/// Typing pause before the console auto-classifies.
pub const AUTO_CLASSIFY_DEBOUNCE: Duration = Duration::from_millis(1_500);
/// Minimum trimmed length (in characters) for auto-classify to fire.
pub const AUTO_CLASSIFY_MIN_CHARS: usize = 5;
/// Number of classification results kept in the console history.
pub const PREDICTION_HISTORY_CAPACITY: usize = 10;
