use bevy::core_pipeline::Skybox;
use bevy::prelude::*;

use constants::render_settings::{
    ENVIRONMENT_FACE_SIZE, ENVIRONMENT_LIGHT_INTENSITY, SKYBOX_BRIGHTNESS,
};

use crate::engine::assets::environment_map::equirect_to_cubemap;
use crate::engine::assets::viewer_manifest::ViewerConfig;
use crate::engine::camera::viewport::ViewportContext;
use crate::engine::loading::error::LoadFailure;
use crate::engine::loading::model_loader::request_model;
use crate::engine::loading::progress::{AssetResolution, LoadSequence, LoadStage, resolve};

pub fn request_environment(
    sequence: &mut LoadSequence,
    asset_server: &AssetServer,
    config: &ViewerConfig,
) {
    sequence.environment = Some(asset_server.load(config.environment.clone()));
    sequence.begin(LoadStage::Environment);
    info!("Loading environment texture from {}", config.environment);
}

/// Waits for the panorama, builds the cube map and binds it as skybox and
/// image-based light. The model is only requested once this succeeds.
pub fn load_environment_system(
    mut commands: Commands,
    mut sequence: ResMut<LoadSequence>,
    mut images: ResMut<Assets<Image>>,
    mut failures: EventWriter<LoadFailure>,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
    viewport: Option<Res<ViewportContext>>,
) {
    if sequence.stage != LoadStage::Environment || !sequence.is_live() {
        return;
    }
    let Some(handle) = sequence.environment.clone() else {
        return;
    };

    let converted = match resolve(&handle, &images, &asset_server) {
        AssetResolution::Pending => return,
        AssetResolution::Ready(panorama) => equirect_to_cubemap(panorama, ENVIRONMENT_FACE_SIZE),
        AssetResolution::Failed(reason) => {
            sequence.stage = LoadStage::Failed;
            failures.write(LoadFailure::Environment {
                path: config.environment.clone(),
                reason,
            });
            return;
        }
    };

    let cube_map = match converted {
        Ok(cube) => images.add(cube),
        Err(err) => {
            sequence.stage = LoadStage::Failed;
            failures.write(LoadFailure::from(err));
            return;
        }
    };

    if let Some(camera) = viewport.as_ref().and_then(|viewport| viewport.camera) {
        commands.entity(camera).insert((
            Skybox {
                image: cube_map.clone(),
                brightness: SKYBOX_BRIGHTNESS,
                rotation: Quat::IDENTITY,
            },
            EnvironmentMapLight {
                diffuse_map: cube_map.clone(),
                specular_map: cube_map.clone(),
                intensity: ENVIRONMENT_LIGHT_INTENSITY,
                ..default()
            },
        ));
    }

    sequence.environment_map = Some(cube_map);
    info!("✓ Environment map ready");
    request_model(&mut sequence, &asset_server, &config);
}
