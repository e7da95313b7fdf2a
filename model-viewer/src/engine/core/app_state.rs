use bevy::prelude::*;

/// Lifecycle of the mounted view.
///
/// `Loading` covers the whole asset sequence. A failed load parks the view in
/// `LoadFailed`, which still renders the empty scene with live controls.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    LoadFailed,
    Unmounted,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Running => "running",
            Self::LoadFailed => "load_failed",
            Self::Unmounted => "unmounted",
        }
    }
}
