use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::path::{ENVIRONMENT_TEXTURE_PATH, MODEL_PATH};
use constants::render_settings::CAMERA_START_POSITION;

/// Viewer manifest as a Bevy asset. Every field is optional; absent fields
/// keep the compiled-in defaults.
#[derive(Asset, Debug, Clone, Default, Serialize, Deserialize, TypePath)]
pub struct ViewerManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<[f32; 3]>,
}

/// Asset paths and camera pose the load sequence works from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub environment: String,
    pub model: String,
    pub camera_position: Vec3,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            environment: ENVIRONMENT_TEXTURE_PATH.to_string(),
            model: MODEL_PATH.to_string(),
            camera_position: CAMERA_START_POSITION,
        }
    }
}

impl ViewerConfig {
    pub fn apply_manifest(&mut self, manifest: &ViewerManifest) {
        if let Some(environment) = manifest.environment.as_deref().filter(|p| !p.is_empty()) {
            self.environment = environment.to_string();
        }
        if let Some(model) = manifest.model.as_deref().filter(|p| !p.is_empty()) {
            self.model = model.to_string();
        }
        if let Some(position) = manifest.camera_position.map(Vec3::from_array) {
            if position.is_finite() {
                self.camera_position = position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_manifest_keeps_remaining_defaults() {
        let manifest: ViewerManifest =
            serde_json::from_str(r#"{ "model": "robot.glb" }"#).expect("valid manifest");
        let mut config = ViewerConfig::default();
        config.apply_manifest(&manifest);

        assert_eq!(config.model, "robot.glb");
        assert_eq!(config.environment, "skyes.hdr");
        assert_eq!(config.camera_position, Vec3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn empty_paths_and_non_finite_poses_are_ignored() {
        let manifest = ViewerManifest {
            environment: Some(String::new()),
            model: None,
            camera_position: Some([f32::NAN, 1.0, 1.0]),
        };
        let mut config = ViewerConfig::default();
        config.apply_manifest(&manifest);
        assert_eq!(config, ViewerConfig::default());
    }
}
