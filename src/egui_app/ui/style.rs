use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_indigo: Color32,
    pub accent_cyan: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub danger: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(10, 10, 15),
        bg_secondary: Color32::from_rgb(19, 19, 27),
        bg_tertiary: Color32::from_rgb(30, 30, 42),
        panel_outline: Color32::from_rgb(42, 42, 58),
        grid_soft: Color32::from_rgb(34, 34, 46),
        text_primary: Color32::from_rgb(232, 232, 240),
        text_muted: Color32::from_rgb(138, 138, 154),
        accent_indigo: Color32::from_rgb(129, 140, 248),
        accent_cyan: Color32::from_rgb(34, 211, 238),
        warning: Color32::from_rgb(251, 191, 36),
        success: Color32::from_rgb(52, 211, 153),
        danger: Color32::from_rgb(248, 113, 113),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_cyan;
    visuals.extreme_bg_color = palette.bg_secondary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.danger;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_indigo);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_widget(&mut visuals.widgets.inactive, palette);
    set_widget(&mut visuals.widgets.hovered, palette);
    set_widget(&mut visuals.widgets.active, palette);
    set_widget(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.popup_shadow = Shadow::NONE;
}

fn set_widget(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(4);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.bg_tertiary;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

/// Border used around cards.
pub fn card_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn grid_stroke() -> Stroke {
    Stroke::new(1.0, palette().grid_soft)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn label(self) -> &'static str {
        match self {
            StatusTone::Idle => "Idle",
            StatusTone::Busy => "Syncing",
            StatusTone::Info => "Info",
            StatusTone::Warning => "Warning",
            StatusTone::Error => "Error",
        }
    }
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::from_rgb(42, 42, 58),
        StatusTone::Busy => Color32::from_rgb(31, 139, 255),
        StatusTone::Info => Color32::from_rgb(64, 140, 112),
        StatusTone::Warning => Color32::from_rgb(192, 138, 43),
        StatusTone::Error => Color32::from_rgb(192, 57, 43),
    }
}

/// Accent color for a news category label.
pub fn label_color(label: &str) -> Color32 {
    match label {
        "World" => Color32::from_rgb(251, 191, 36),
        "Sports" => Color32::from_rgb(52, 211, 153),
        "Business" => Color32::from_rgb(96, 165, 250),
        "Sci/Tech" => Color32::from_rgb(167, 139, 250),
        _ => palette().text_muted,
    }
}

/// Translucent fill behind a label chip.
pub fn label_fill(label: &str) -> Color32 {
    let color = label_color(label);
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 30)
}
