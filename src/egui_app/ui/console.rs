use std::time::Instant;

use eframe::egui::{self, RichText, Ui};

use super::charts;
use super::{EguiApp, section_card, style};
use crate::classify::{PredictionResult, SAMPLE_PROMPTS};
use crate::egui_app::view_model;

const SAMPLE_CHIP_CHARS: usize = 70;

impl EguiApp {
    pub(super) fn render_console(&mut self, ui: &mut Ui, now: Instant) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.heading("Test Model");
            ui.label(
                RichText::new("Classify news articles into World, Sports, Business, or Sci/Tech")
                    .color(palette.text_muted),
            );
            if let Some(mode) = self.controller.console().server_mode() {
                ui.label(RichText::new(mode.badge()).color(palette.accent_cyan).strong());
            }
        });
        ui.add_space(8.0);

        section_card(ui, "Input Text", |ui| {
            let mut draft = self.controller.console().input().to_string();
            let response = ui.add(
                egui::TextEdit::multiline(&mut draft)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY)
                    .hint_text("Paste a news headline or article here..."),
            );
            if response.changed() {
                self.controller.set_console_input(draft, now);
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let loading = self.controller.console().is_loading();
                let label = if loading { "Classifying..." } else { "Classify" };
                if ui
                    .add_enabled(self.controller.console().can_submit(), egui::Button::new(label))
                    .clicked()
                {
                    self.controller.classify_now();
                }
                if loading {
                    ui.spinner();
                }
                if ui.button("Clear").clicked() {
                    self.controller.clear_console();
                }
            });
            ui.add_space(8.0);
            ui.label(RichText::new("Try a sample").small().color(palette.text_muted));
            ui.horizontal_wrapped(|ui| {
                for sample in SAMPLE_PROMPTS {
                    if ui
                        .button(view_model::truncate(sample, SAMPLE_CHIP_CHARS))
                        .on_hover_text(sample)
                        .clicked()
                    {
                        self.controller.use_sample(sample);
                    }
                }
            });
        });

        if let Some(error) = self.controller.console().error() {
            ui.add_space(8.0);
            ui.colored_label(palette.danger, format!("Error: {error}"));
        }

        if let Some(result) = self.controller.console().result() {
            ui.add_space(8.0);
            section_card(ui, "Prediction", |ui| render_result(ui, result));
        }

        let history = self.controller.console().history();
        if !history.is_empty() {
            ui.add_space(8.0);
            section_card(ui, "Recent Predictions", |ui| {
                egui::Grid::new("prediction_history")
                    .num_columns(5)
                    .striped(true)
                    .show(ui, |ui| {
                        for header in ["Text", "Label", "Confidence", "Latency", "Time"] {
                            ui.label(RichText::new(header).color(palette.text_muted));
                        }
                        ui.end_row();
                        for entry in history.iter() {
                            let row = view_model::history_row(entry);
                            ui.label(row.text).on_hover_text(&entry.text);
                            ui.label(RichText::new(&row.label).color(style::label_color(&row.label)));
                            ui.label(row.confidence);
                            ui.label(row.latency);
                            ui.label(RichText::new(row.time).monospace());
                            ui.end_row();
                        }
                    });
            });
        }
    }
}

fn render_result(ui: &mut Ui, result: &PredictionResult) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        egui::Frame::new()
            .fill(style::label_fill(&result.label))
            .corner_radius(4)
            .inner_margin(egui::Margin::symmetric(8, 2))
            .show(ui, |ui| {
                ui.label(
                    RichText::new(&result.label)
                        .strong()
                        .color(style::label_color(&result.label)),
                );
            });
        ui.label(format!("{} confidence", view_model::percent(result.confidence)));
        ui.label(RichText::new(format!("{}ms", result.latency_ms)).color(palette.text_muted));
    });
    ui.add_space(6.0);
    ui.label(RichText::new(&result.text).italics().color(palette.text_muted));
    ui.add_space(6.0);
    egui::Grid::new("probabilities").num_columns(3).show(ui, |ui| {
        for (label, probability) in result.ranked_probabilities() {
            ui.label(label);
            charts::fraction_bar(ui, probability, style::label_color(label), 240.0);
            ui.label(view_model::percent(probability));
            ui.end_row();
        }
    });
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(&result.model).monospace().color(palette.text_muted));
        ui.label(
            RichText::new(format!("{} mode", result.mode.badge())).color(palette.text_muted),
        );
    });
}
