//! Library exports for the dashboard binary and integration tests.
/// Per-user application directories.
pub mod app_dirs;
/// Interactive classification console.
pub mod classify;
/// Shared egui UI modules.
pub mod egui_app;
mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// Training/evaluation metrics and their background sync.
pub mod metrics;
/// Persisted settings and endpoint resolution.
pub mod settings;
/// Timestamp parsing and display.
pub mod timefmt;
