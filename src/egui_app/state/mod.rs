//! Shared state types for the egui UI.

mod server;
mod status;

pub use server::*;
pub use status::*;

/// Top-level pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Overview,
    TestModel,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Overview, Page::TestModel];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::TestModel => "Test Model",
        }
    }
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub page: Page,
    pub status: StatusBarState,
    pub server: ServerBadge,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            page: Page::Overview,
            status: StatusBarState::idle(),
            server: ServerBadge::Unknown,
        }
    }
}
