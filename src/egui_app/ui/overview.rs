use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};

use super::charts::{self, Series};
use super::{EguiApp, section_card, style};
use crate::egui_app::view_model;
use crate::metrics::{ConfusionMatrix, StepStatus};

const CHART_HEIGHT: f32 = 200.0;

impl EguiApp {
    pub(super) fn render_overview(&mut self, ui: &mut Ui) {
        let store = self.controller.store();
        let palette = style::palette();

        let cards = view_model::kpi_cards(store.metrics());
        let accents = [
            palette.accent_indigo,
            palette.success,
            Color32::from_rgb(167, 139, 250),
            palette.warning,
        ];
        ui.columns(cards.len(), |columns| {
            for ((column, card), accent) in columns.iter_mut().zip(cards).zip(accents) {
                section_card(column, card.title, |ui| {
                    ui.label(RichText::new(card.value).size(28.0).strong().color(accent));
                });
            }
        });
        ui.add_space(12.0);

        let history = store.history();
        ui.columns(2, |columns| {
            section_card(&mut columns[0], "Training History - Loss", |ui| {
                charts::line_chart(
                    ui,
                    "epoch",
                    &[
                        Series {
                            name: "train loss",
                            color: palette.accent_indigo,
                            points: view_model::epoch_series(history, |row| row.train_loss),
                        },
                        Series {
                            name: "val loss",
                            color: palette.danger,
                            points: view_model::epoch_series(history, |row| row.val_loss),
                        },
                    ],
                    CHART_HEIGHT,
                );
            });
            section_card(&mut columns[1], "Training History - Accuracy & F1", |ui| {
                charts::line_chart(
                    ui,
                    "epoch",
                    &[
                        Series {
                            name: "train acc",
                            color: palette.accent_indigo,
                            points: view_model::epoch_series(history, |row| row.train_acc),
                        },
                        Series {
                            name: "val acc",
                            color: palette.success,
                            points: view_model::epoch_series(history, |row| row.val_acc),
                        },
                        Series {
                            name: "val f1",
                            color: palette.warning,
                            points: view_model::epoch_series(history, |row| row.val_f1),
                        },
                    ],
                    CHART_HEIGHT,
                );
            });
        });
        ui.add_space(12.0);

        ui.columns(3, |columns| {
            section_card(&mut columns[0], "Pipeline Status", |ui| {
                for step in store.pipeline() {
                    ui.horizontal(|ui| {
                        let color = match step.status {
                            StepStatus::Success => palette.success,
                            StepStatus::Running => palette.accent_cyan,
                            StepStatus::Pending => palette.text_muted,
                            StepStatus::Failed => palette.danger,
                        };
                        ui.label(
                            RichText::new(view_model::step_marker(step.status))
                                .monospace()
                                .color(color),
                        );
                        ui.label(&step.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let detail = step
                                .duration
                                .clone()
                                .unwrap_or_else(|| step.status.label().to_string());
                            ui.label(RichText::new(detail).color(palette.text_muted));
                        });
                    });
                }
            });
            section_card(&mut columns[1], "Model Info", |ui| {
                egui::Grid::new("model_info").num_columns(2).show(ui, |ui| {
                    for (label, value) in view_model::model_info(store.model_name()) {
                        ui.label(RichText::new(label).color(palette.text_muted));
                        ui.label(value);
                        ui.end_row();
                    }
                });
            });
            section_card(&mut columns[2], "Confusion Matrix", |ui| {
                render_confusion(ui, store.confusion());
            });
        });
        ui.add_space(12.0);

        ui.columns(2, |columns| {
            section_card(&mut columns[0], "Precision-Recall Curve", |ui| {
                let points = store
                    .pr_curve()
                    .iter()
                    .map(|point| [point.recall, point.precision])
                    .collect();
                charts::line_chart(
                    ui,
                    "recall",
                    &[Series {
                        name: "precision",
                        color: palette.accent_cyan,
                        points,
                    }],
                    CHART_HEIGHT,
                );
            });
            section_card(&mut columns[1], "Per-class Report", |ui| {
                let report = store.classification_report();
                if report.is_empty() {
                    ui.label(
                        RichText::new("No per-class report in the latest evaluation")
                            .color(palette.text_muted),
                    );
                    return;
                }
                egui::Grid::new("class_report")
                    .num_columns(5)
                    .striped(true)
                    .show(ui, |ui| {
                        for header in ["Class", "Precision", "Recall", "F1", "Support"] {
                            ui.label(RichText::new(header).color(palette.text_muted));
                        }
                        ui.end_row();
                        for (label, class) in report {
                            ui.label(RichText::new(label).color(style::label_color(label)));
                            ui.label(view_model::percent(class.precision));
                            ui.label(view_model::percent(class.recall));
                            ui.label(view_model::percent(class.f1));
                            ui.label(class.support.to_string());
                            ui.end_row();
                        }
                    });
            });
        });
    }
}

fn render_confusion(ui: &mut Ui, matrix: &ConfusionMatrix) {
    let palette = style::palette();
    let max = matrix.max_count();
    egui::Grid::new("confusion_matrix")
        .spacing(egui::vec2(3.0, 3.0))
        .show(ui, |ui| {
            ui.label("");
            for label in matrix.labels() {
                ui.label(RichText::new(label).small().color(palette.text_muted));
            }
            ui.label(RichText::new("Recall").small().color(palette.text_muted));
            ui.end_row();
            for (row_index, (label, row)) in matrix.labels().iter().zip(matrix.rows()).enumerate() {
                ui.label(RichText::new(label).small().color(palette.text_muted));
                for (col_index, count) in row.iter().enumerate() {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(52.0, 26.0), Sense::hover());
                    let base = if row_index == col_index {
                        palette.accent_indigo
                    } else {
                        palette.danger
                    };
                    let alpha = 20 + (view_model::heat_intensity(*count, max) * 200.0) as u8;
                    ui.painter().rect_filled(
                        rect,
                        3.0,
                        Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), alpha),
                    );
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        count.to_string(),
                        FontId::monospace(11.0),
                        palette.text_primary,
                    );
                }
                let recall = matrix
                    .row_recall(row_index)
                    .map(view_model::percent)
                    .unwrap_or_else(|| "-".to_string());
                ui.label(RichText::new(recall).small());
                ui.end_row();
            }
        });
}
