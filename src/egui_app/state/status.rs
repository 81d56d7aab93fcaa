use crate::egui_app::ui::style::{self, StatusTone};
use egui::Color32;

const STATUS_LOG_LIMIT: usize = 50;

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Rolling log of earlier messages, oldest first.
    pub log: Vec<String>,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Showing demo metrics".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(StatusTone::Idle),
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let text = text.into();
        if !self.text.is_empty() {
            self.log.push(std::mem::take(&mut self.text));
            if self.log.len() > STATUS_LOG_LIMIT {
                let overflow = self.log.len() - STATUS_LOG_LIMIT;
                self.log.drain(..overflow);
            }
        }
        self.text = text;
        self.badge_label = tone.label().into();
        self.badge_color = style::status_badge_color(tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rolls_previous_text_into_log() {
        let mut status = StatusBarState::idle();
        status.set("Metrics synced", StatusTone::Info);
        assert_eq!(status.text, "Metrics synced");
        assert_eq!(status.badge_label, "Info");
        assert_eq!(status.log, ["Showing demo metrics"]);
    }

    #[test]
    fn log_is_bounded() {
        let mut status = StatusBarState::idle();
        for index in 0..(STATUS_LOG_LIMIT + 10) {
            status.set(format!("message {index}"), StatusTone::Info);
        }
        assert_eq!(status.log.len(), STATUS_LOG_LIMIT);
    }
}
