use bevy::gltf::Gltf;
use bevy::prelude::*;

use constants::render_settings::MODEL_NORMAL_SCALE;

use crate::engine::assets::viewer_manifest::ViewerConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::error::LoadFailure;
use crate::engine::loading::progress::{AssetResolution, LoadSequence, LoadStage, resolve};
use crate::engine::scene::model::{AnimationDriver, LoadedModel, ModelRoot, prepare_model_scene};

pub fn request_model(sequence: &mut LoadSequence, asset_server: &AssetServer, config: &ViewerConfig) {
    sequence.model = Some(asset_server.load(config.model.clone()));
    sequence.begin(LoadStage::Model);
    info!("Loading model from {}", config.model);
}

/// Spawns the model's default scene once the glTF is decoded and publishes
/// it as `LoadedModel`.
pub fn load_model_system(
    mut commands: Commands,
    mut sequence: ResMut<LoadSequence>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut failures: EventWriter<LoadFailure>,
    mut next_state: ResMut<NextState<AppState>>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    config: Res<ViewerConfig>,
) {
    if sequence.stage != LoadStage::Model || !sequence.is_live() {
        return;
    }
    let Some(handle) = sequence.model.clone() else {
        return;
    };

    let gltf = match resolve(&handle, &gltfs, &asset_server) {
        AssetResolution::Pending => return,
        AssetResolution::Ready(gltf) => gltf,
        AssetResolution::Failed(reason) => {
            sequence.stage = LoadStage::Failed;
            failures.write(LoadFailure::Model {
                path: config.model.clone(),
                reason,
            });
            return;
        }
    };

    let Some(scene) = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
    else {
        sequence.stage = LoadStage::Failed;
        failures.write(LoadFailure::MissingScene {
            path: config.model.clone(),
        });
        return;
    };

    // Only the first clip is driven.
    let animation = gltf.animations.first().map(|clip| {
        let (graph, node) = AnimationGraph::from_clip(clip.clone());
        AnimationDriver {
            graph: graphs.add(graph),
            node,
        }
    });

    let root = commands
        .spawn((
            SceneRoot(scene.clone()),
            Transform::from_scale(Vec3::splat(MODEL_NORMAL_SCALE)),
            ModelRoot,
            Name::new("model"),
        ))
        .observe(prepare_model_scene)
        .id();

    commands.insert_resource(LoadedModel {
        root,
        gltf: handle,
        scene,
        animation,
    });

    sequence.stage = LoadStage::Complete;
    next_state.set(AppState::Running);
    info!("✓ Model spawned with {} animation clip(s)", gltf.animations.len());
}
