use serde::{Deserialize, Serialize};

use super::urls::{DEFAULT_API_URL, normalize_api_base_url, normalize_metrics_base_url};
use super::{API_URL_ENV, METRICS_URL_ENV};

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `metrics_url`, `api_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Base URL serving `latest_evaluation.json` and `latest_metrics.json`.
    /// When absent the dashboard keeps its built-in demo values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_url: Option<String>,
    /// Base URL of the inference server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Endpoint bases after env overrides and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// `None` disables metrics sync entirely.
    pub metrics_base: Option<String>,
    /// Always usable; `/predict` and `/health` are appended by the clients.
    pub api_base: String,
}

impl DashboardSettings {
    /// Resolve endpoints from the process environment and this file's values.
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints_with(|key| std::env::var(key).ok())
    }

    /// Resolve endpoints using `lookup` for environment overrides.
    pub fn endpoints_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Endpoints {
        let pick = |key: &str, file_value: &Option<String>| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file_value.clone())
        };
        let metrics_base = pick(METRICS_URL_ENV, &self.metrics_url)
            .and_then(|raw| match normalize_metrics_base_url(&raw) {
                Some(url) => Some(url),
                None => {
                    tracing::warn!("Ignoring invalid metrics URL {raw:?}; using demo data");
                    None
                }
            });
        let api_base = pick(API_URL_ENV, &self.api_url)
            .and_then(|raw| match normalize_api_base_url(&raw) {
                Some(url) => Some(url),
                None => {
                    tracing::warn!("Ignoring invalid API URL {raw:?}; using {DEFAULT_API_URL}");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Endpoints {
            metrics_base,
            api_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_disable_sync_and_use_local_api() {
        let endpoints = DashboardSettings::default().endpoints_with(no_env);
        assert_eq!(endpoints.metrics_base, None);
        assert_eq!(endpoints.api_base, "http://localhost:8000");
    }

    #[test]
    fn env_overrides_file_values() {
        let settings = DashboardSettings {
            metrics_url: Some("https://file.example.com/metrics".into()),
            api_url: Some("https://file.example.com".into()),
        };
        let endpoints = settings.endpoints_with(|key| match key {
            METRICS_URL_ENV => Some("https://env.example.com/m/".into()),
            API_URL_ENV => Some("https://env.example.com/Predict".into()),
            _ => None,
        });
        assert_eq!(
            endpoints.metrics_base.as_deref(),
            Some("https://env.example.com/m")
        );
        assert_eq!(endpoints.api_base, "https://env.example.com");
    }

    #[test]
    fn blank_env_value_falls_back_to_file() {
        let settings = DashboardSettings {
            metrics_url: None,
            api_url: Some("https://api.example.com/health".into()),
        };
        let endpoints = settings.endpoints_with(|key| (key == API_URL_ENV).then(|| "  ".into()));
        assert_eq!(endpoints.api_base, "https://api.example.com");
    }

    #[test]
    fn invalid_urls_are_ignored() {
        let settings = DashboardSettings {
            metrics_url: Some("not a url".into()),
            api_url: Some("ftp://example.com".into()),
        };
        let endpoints = settings.endpoints_with(no_env);
        assert_eq!(endpoints.metrics_base, None);
        assert_eq!(endpoints.api_base, DEFAULT_API_URL);
    }
}
