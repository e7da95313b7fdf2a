use bevy::prelude::*;

use constants::path::VIEWER_MANIFEST_PATH;
use constants::render_settings::CAMERA_FOCUS;

use crate::engine::assets::viewer_manifest::{ViewerConfig, ViewerManifest};
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::loading::environment_loader::request_environment;
use crate::engine::loading::progress::{AssetResolution, LoadSequence, LoadStage, resolve};

// Start the loading process
pub fn start_loading(mut sequence: ResMut<LoadSequence>, asset_server: Res<AssetServer>) {
    sequence.manifest = Some(asset_server.load(VIEWER_MANIFEST_PATH));
    sequence.begin(LoadStage::Manifest);
    info!("Loading viewer manifest from {}", VIEWER_MANIFEST_PATH);
}

/// Applies the manifest, if any, then hands over to the environment stage.
/// A missing manifest is not an error; compiled-in defaults apply.
pub fn load_manifest_system(
    mut sequence: ResMut<LoadSequence>,
    mut config: ResMut<ViewerConfig>,
    mut orbit: ResMut<OrbitCamera>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ViewerManifest>>,
) {
    if sequence.stage != LoadStage::Manifest || !sequence.is_live() {
        return;
    }

    if let Some(handle) = sequence.manifest.clone() {
        match resolve(&handle, &manifests, &asset_server) {
            AssetResolution::Pending => return,
            AssetResolution::Ready(manifest) => {
                config.apply_manifest(manifest);
                *orbit = OrbitCamera::new(config.camera_position, CAMERA_FOCUS);
                info!("✓ Viewer manifest applied");
            }
            AssetResolution::Failed(reason) => {
                warn!("Viewer manifest unavailable, using defaults: {}", reason);
            }
        }
    }

    sequence.manifest = None;
    request_environment(&mut sequence, &asset_server, &config);
}
