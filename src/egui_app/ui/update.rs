use std::time::Instant;

use eframe::egui;

use super::EguiApp;
use crate::egui_app::state::Page;

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        let now = Instant::now();
        self.controller.poll_background_jobs(now);
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.controller.ui.page {
                    Page::Overview => self.render_overview(ui),
                    Page::TestModel => self.render_console(ui, now),
                });
        });
        self.schedule_repaint(ctx, now);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}
