//! egui renderer for the dashboard.

mod charts;
mod chrome;
mod console;
mod overview;
pub mod style;
mod update;

use std::time::{Duration, Instant};

use eframe::egui::{self, Frame, Margin, RichText, Ui};

use crate::egui_app::controller::{DashboardController, DashboardSources};
use crate::settings;

/// Smallest window size the layout is designed for.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

const BUSY_REPAINT: Duration = Duration::from_millis(50);
/// Idle repaint interval; bounds how late a finished sync shows up.
const IDLE_REPAINT: Duration = Duration::from_millis(500);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl EguiApp {
    /// Load `config.toml`, resolve endpoints and start background work.
    pub fn new() -> Result<Self, String> {
        let config = settings::load_or_default()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        let endpoints = config.endpoints();
        match &endpoints.metrics_base {
            Some(base) => tracing::info!("Syncing metrics from {base}"),
            None => tracing::info!("Metrics sync disabled"),
        }
        tracing::info!("Classification API: {}", endpoints.api_base);
        Ok(Self::with_controller(DashboardController::new(
            DashboardSources::from_endpoints(&endpoints),
        )))
    }

    pub fn with_controller(controller: DashboardController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let mut delay = if self.controller.has_pending_work() {
            BUSY_REPAINT
        } else {
            IDLE_REPAINT
        };
        if let Some(deadline) = self.controller.next_deadline() {
            delay = delay.min(deadline.saturating_duration_since(now));
        }
        ctx.request_repaint_after(delay);
    }
}

/// Framed card with a muted title, used by both pages.
pub(super) fn section_card<R>(
    ui: &mut Ui,
    title: &str,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> R {
    let palette = style::palette();
    Frame::new()
        .fill(palette.bg_secondary)
        .stroke(style::card_stroke())
        .corner_radius(6)
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(palette.text_muted).small().strong());
            ui.add_space(6.0);
            add_contents(ui)
        })
        .inner
}
