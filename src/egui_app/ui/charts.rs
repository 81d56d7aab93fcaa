//! Minimal painter-based charts.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui};

use super::style;

pub(super) struct Series<'a> {
    pub name: &'a str,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    /// Bounding box over all points, widened so no axis is degenerate.
    fn of(series: &[Series<'_>]) -> Option<Self> {
        let mut points = series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let mut bounds = Bounds {
            x_min: first[0],
            x_max: first[0],
            y_min: first[1],
            y_max: first[1],
        };
        for [x, y] in points {
            bounds.x_min = bounds.x_min.min(*x);
            bounds.x_max = bounds.x_max.max(*x);
            bounds.y_min = bounds.y_min.min(*y);
            bounds.y_max = bounds.y_max.max(*y);
        }
        if bounds.x_max - bounds.x_min < f64::EPSILON {
            bounds.x_min -= 0.5;
            bounds.x_max += 0.5;
        }
        let pad = ((bounds.y_max - bounds.y_min) * 0.1).max(0.01);
        bounds.y_min -= pad;
        bounds.y_max += pad;
        Some(bounds)
    }

    fn project(&self, point: [f64; 2], rect: Rect) -> Pos2 {
        let tx = (point[0] - self.x_min) / (self.x_max - self.x_min);
        let ty = (point[1] - self.y_min) / (self.y_max - self.y_min);
        egui::pos2(
            rect.left() + tx as f32 * rect.width(),
            rect.bottom() - ty as f32 * rect.height(),
        )
    }
}

pub(super) fn line_chart(ui: &mut Ui, x_label: &str, series: &[Series<'_>], height: f32) {
    let palette = style::palette();
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, palette.bg_primary);
    let plot = Rect::from_min_max(
        rect.min + egui::vec2(44.0, 10.0),
        rect.max - egui::vec2(10.0, 18.0),
    );
    let Some(bounds) = Bounds::of(series) else {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No data",
            FontId::proportional(12.0),
            palette.text_muted,
        );
        return;
    };
    for step in 0..=4 {
        let t = step as f32 / 4.0;
        let y = plot.bottom() - t * plot.height();
        painter.line_segment(
            [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            style::grid_stroke(),
        );
        let value = bounds.y_min + (bounds.y_max - bounds.y_min) * f64::from(t);
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{value:.2}"),
            FontId::proportional(10.0),
            palette.text_muted,
        );
    }
    painter.text(
        egui::pos2(plot.center().x, rect.bottom() - 4.0),
        Align2::CENTER_BOTTOM,
        x_label,
        FontId::proportional(10.0),
        palette.text_muted,
    );
    for s in series {
        let points: Vec<Pos2> = s
            .points
            .iter()
            .map(|point| bounds.project(*point, plot))
            .collect();
        for point in &points {
            painter.circle_filled(*point, 2.5, s.color);
        }
        if points.len() >= 2 {
            painter.add(Shape::line(points, Stroke::new(2.0, s.color)));
        }
    }
    ui.horizontal(|ui| {
        for s in series {
            ui.label(RichText::new(s.name).color(s.color).small());
            ui.add_space(8.0);
        }
    });
}

/// Horizontal bar filled to `fraction` of the available width.
pub(super) fn fraction_bar(ui: &mut Ui, fraction: f64, color: Color32, width: f32) {
    let palette = style::palette();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 10.0), Sense::hover());
    ui.painter().rect_filled(rect, 3.0, palette.bg_tertiary);
    let fill = rect.width() * fraction.clamp(0.0, 1.0) as f32;
    if fill > 0.0 {
        let filled = Rect::from_min_size(rect.min, egui::vec2(fill, rect.height()));
        ui.painter().rect_filled(filled, 3.0, color);
    }
}
