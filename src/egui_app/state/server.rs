use crate::classify::ServingMode;

/// What the dashboard currently believes about the inference server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerBadge {
    /// No probe has finished yet.
    Unknown,
    Checking,
    Online(ServingMode),
    Offline,
}

impl ServerBadge {
    pub fn label(self) -> &'static str {
        match self {
            ServerBadge::Unknown => "Not checked",
            ServerBadge::Checking => "Checking",
            ServerBadge::Online(mode) => mode.badge(),
            ServerBadge::Offline => "Offline",
        }
    }
}
