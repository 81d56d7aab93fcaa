/// API base used when neither the config file nor the environment sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Endpoint suffixes users commonly paste along with the base URL.
const ENDPOINT_SUFFIXES: [&str; 2] = ["/predict", "/health"];

/// Normalize an inference API base URL so `/predict` can be appended safely.
///
/// Trailing slashes are trimmed and a trailing `/predict` or `/health`
/// (any case) is removed. Returns `None` for blank input or anything that is
/// not an absolute http(s) URL.
pub fn normalize_api_base_url(raw: &str) -> Option<String> {
    let mut base = raw.trim().trim_end_matches('/');
    for suffix in ENDPOINT_SUFFIXES {
        if ends_with_ignore_case(base, suffix) {
            base = base[..base.len() - suffix.len()].trim_end_matches('/');
            break;
        }
    }
    is_http_url(base).then(|| base.to_string())
}

/// Normalize the metrics source base URL (trailing slashes only).
pub fn normalize_metrics_base_url(raw: &str) -> Option<String> {
    let base = raw.trim().trim_end_matches('/');
    is_http_url(base).then(|| base.to_string())
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn is_http_url(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
