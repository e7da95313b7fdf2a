//! Ordered asset loading for the mounted view.
//!
//! Manifest, environment texture and model are fetched strictly one after
//! another. Each stage only starts once the previous one resolved, and every
//! stage drops its result if the view was unmounted in the meantime.

use bevy::prelude::*;

use crate::engine::assets::viewer_manifest::ViewerConfig;
use crate::engine::core::app_setup::setup;
use crate::engine::core::app_state::AppState;
use crate::engine::teardown::enter_unmounted;
use crate::rpc::web_rpc::WebRpcInterface;

/// Equirectangular environment texture stage.
///
/// Converts the panorama into a cube map and binds it to the camera.
pub mod environment_loader;

/// Load failure taxonomy.
pub mod error;

/// Optional viewer manifest stage; seeds `ViewerConfig` and the camera pose.
pub mod manifest_loader;

/// glTF model stage and scene spawning.
pub mod model_loader;

/// Load sequence state and per-handle resolution.
pub mod progress;

use environment_loader::load_environment_system;
use error::LoadFailure;
use manifest_loader::{load_manifest_system, start_loading};
use model_loader::load_model_system;
use progress::{LoadSequence, LoadStage};

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadSequence>()
            .add_event::<LoadFailure>()
            .add_systems(Startup, start_loading.after(setup))
            .add_systems(
                Update,
                (
                    load_manifest_system,
                    load_environment_system,
                    load_model_system,
                    publish_load_stage,
                )
                    .chain()
                    .run_if(in_state(AppState::Loading)),
            )
            // An unmount landing in the same frame as a failure must win.
            .add_systems(
                Update,
                handle_load_failure
                    .run_if(in_state(AppState::Loading))
                    .before(enter_unmounted),
            )
            .add_systems(OnEnter(AppState::Running), announce_model_loaded);
    }
}

/// Logs a load failure, reports it to the host and parks the view.
/// Camera, controls and the empty scene keep running.
pub fn handle_load_failure(
    mut failures: EventReader<LoadFailure>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for failure in failures.read() {
        error!("Load sequence aborted: {}", failure);
        rpc_interface.send_notification(
            "load_failed",
            serde_json::json!({
                "stage": failure.stage().as_str(),
                "message": failure.to_string(),
            }),
        );
        next_state.set(AppState::LoadFailed);
    }
}

fn publish_load_stage(
    sequence: Res<LoadSequence>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_stage: Local<Option<LoadStage>>,
) {
    if *last_stage == Some(sequence.stage) {
        return;
    }
    *last_stage = Some(sequence.stage);
    rpc_interface.send_notification(
        "load_stage",
        serde_json::json!({ "stage": sequence.stage.as_str() }),
    );
}

fn announce_model_loaded(config: Res<ViewerConfig>, mut rpc_interface: ResMut<WebRpcInterface>) {
    info!("Viewer running with {}", config.model);
    rpc_interface.send_notification(
        "model_loaded",
        serde_json::json!({ "model": config.model }),
    );
}
