use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

use super::{EguiApp, style};
use crate::classify::ServingMode;
use crate::egui_app::state::{Page, ServerBadge};

fn server_badge_color(badge: ServerBadge) -> egui::Color32 {
    let palette = style::palette();
    match badge {
        ServerBadge::Online(ServingMode::Real) => palette.success,
        ServerBadge::Online(ServingMode::Demo) => palette.warning,
        ServerBadge::Offline => palette.danger,
        ServerBadge::Unknown | ServerBadge::Checking => palette.text_muted,
    }
}

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .stroke(style::card_stroke())
                    .inner_margin(Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("LLMOps Dashboard")
                            .size(18.0)
                            .strong()
                            .color(palette.text_primary),
                    );
                    ui.add_space(16.0);
                    for page in Page::ALL {
                        ui.selectable_value(&mut self.controller.ui.page, page, page.title());
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let badge = self.controller.ui.server;
                        let checking = badge == ServerBadge::Checking;
                        if ui
                            .add_enabled(!checking, egui::Button::new("Check server"))
                            .on_hover_text(self.controller.console().endpoint())
                            .clicked()
                        {
                            self.controller.check_server();
                        }
                        ui.label(RichText::new(badge.label()).color(server_badge_color(badge)));
                        ui.separator();
                        ui.label(
                            RichText::new(format!(
                                "Last updated {}",
                                self.controller.store().last_updated()
                            ))
                            .color(palette.text_muted),
                        );
                        if self.controller.store().is_demo() {
                            ui.label(RichText::new("Demo data").color(palette.warning));
                        }
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::card_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 2.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        2.0,
                        style::grid_stroke(),
                        StrokeKind::Inside,
                    );
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    let response =
                        ui.label(RichText::new(&status.text).color(palette.text_primary));
                    if !status.log.is_empty() {
                        response.on_hover_text(status.log.join("\n"));
                    }
                });
            });
    }
}
