//! Helpers to convert domain data into egui-facing view structs.

use crate::classify::PredictionResult;
use crate::metrics::{EpochRecord, MetricsSnapshot, StepStatus};
use crate::timefmt;

/// One headline number on the overview page.
#[derive(Clone, Debug, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
}

pub fn kpi_cards(metrics: &MetricsSnapshot) -> [KpiCard; 4] {
    [
        KpiCard {
            title: "Accuracy",
            value: percent(metrics.accuracy),
        },
        KpiCard {
            title: "F1 (weighted)",
            value: percent(metrics.f1_weighted),
        },
        KpiCard {
            title: "F1 (macro)",
            value: percent(metrics.f1_macro),
        },
        KpiCard {
            title: "MCC",
            value: format!("{:.3}", metrics.mcc),
        },
    ]
}

/// `0.9123` -> `"91.2%"`.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Shorten `text` to at most `max_chars` characters, ending in `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Row of the "Recent predictions" table.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    pub text: String,
    pub label: String,
    pub confidence: String,
    pub latency: String,
    pub time: String,
}

pub fn history_row(result: &PredictionResult) -> HistoryRow {
    HistoryRow {
        text: truncate(&result.text, 80),
        label: result.label.clone(),
        confidence: percent(result.confidence),
        latency: format!("{}ms", result.latency_ms),
        time: timefmt::display_time(result.timestamp),
    }
}

/// Curve points for the training charts, x = epoch.
pub fn epoch_series(
    history: &[EpochRecord],
    value: impl Fn(&EpochRecord) -> f64,
) -> Vec<[f64; 2]> {
    history
        .iter()
        .map(|row| [f64::from(row.epoch), value(row)])
        .collect()
}

const MODEL_INFO: [(&str, &str); 10] = [
    ("Architecture", "DistilBERT"),
    ("Base Model", "distilbert-base-uncased"),
    ("Dataset", "AG News (120K)"),
    ("Classes", "4 (World, Sports, Business, Sci/Tech)"),
    ("Max Seq Length", "128 tokens"),
    ("Batch Size", "32"),
    ("Learning Rate", "2e-5"),
    ("Optimizer", "AdamW"),
    ("Infrastructure", "SageMaker ml.m5.large"),
    ("Container", "Docker -> ECR"),
];

/// Model card rows; a synced `model_name` replaces the base model entry.
pub fn model_info(model_name: Option<&str>) -> Vec<(&'static str, String)> {
    MODEL_INFO
        .iter()
        .map(|(label, value)| match (*label, model_name) {
            ("Base Model", Some(name)) => (*label, name.to_string()),
            _ => (*label, value.to_string()),
        })
        .collect()
}

pub fn step_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Success => "OK",
        StepStatus::Running => "..",
        StepStatus::Pending => "--",
        StepStatus::Failed => "!!",
    }
}

/// Cell shading for a confusion-matrix count, in `0.0..=1.0`.
pub fn heat_intensity(count: u64, max: u64) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (count as f64 / max as f64).clamp(0.0, 1.0) as f32
}
