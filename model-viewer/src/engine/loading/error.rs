use bevy::prelude::*;

use crate::engine::assets::environment_map::EnvironmentMapError;
use crate::engine::loading::progress::LoadStage;

/// Terminal failure of the load sequence. No retry is attempted.
#[derive(Debug, Event, thiserror::Error)]
pub enum LoadFailure {
    #[error("environment texture {path} failed to load: {reason}")]
    Environment { path: String, reason: String },
    #[error("environment texture cannot be converted: {0}")]
    EnvironmentFormat(#[from] EnvironmentMapError),
    #[error("model {path} failed to load: {reason}")]
    Model { path: String, reason: String },
    #[error("model {path} contains no scene")]
    MissingScene { path: String },
}

impl LoadFailure {
    pub fn stage(&self) -> LoadStage {
        match self {
            Self::Environment { .. } | Self::EnvironmentFormat(_) => LoadStage::Environment,
            Self::Model { .. } | Self::MissingScene { .. } => LoadStage::Model,
        }
    }
}
