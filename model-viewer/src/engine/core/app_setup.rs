use bevy::asset::AssetMetaCheck;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_common_assets::json::JsonAssetPlugin;

use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

// Crate engine modules
use crate::engine::assets::viewer_manifest::{ViewerConfig, ViewerManifest};
use crate::engine::camera::orbit_camera::{OrbitCamera, ViewerCamera};
use crate::engine::camera::viewport::ViewportContext;
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::LoadingPlugin;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::systems::frame_loop::FrameLoopPlugin;
use crate::engine::teardown::TeardownPlugin;
// Crate tools modules
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::interaction::InteractionPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ViewerManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(LoadingPlugin)
        .add_plugins(FrameLoopPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(TeardownPlugin);

    app.init_resource::<ViewerConfig>()
        .init_resource::<OrbitCamera>()
        .add_systems(Startup, setup);

    app
}

/// Scene bootstrap: lighting, camera and the viewport context. Runs once per mount.
pub fn setup(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    orbit: Res<OrbitCamera>,
) {
    let mut viewport = windows
        .single()
        .map(ViewportContext::from_window)
        .unwrap_or_default();

    spawn_lighting(&mut commands);
    let camera = spawn_viewer_camera(&mut commands, &viewport, &orbit);
    viewport.attach(camera);

    let physical = viewport.physical_size();
    info!(
        "Viewport mounted at {}x{} ({}x{} physical, pixel ratio {})",
        viewport.surface_size.x,
        viewport.surface_size.y,
        physical.x,
        physical.y,
        viewport.scale_factor
    );
    commands.insert_resource(viewport);
}

fn spawn_viewer_camera(
    commands: &mut Commands,
    viewport: &ViewportContext,
    orbit: &OrbitCamera,
) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                aspect_ratio: viewport.aspect(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
            }),
            orbit.transform(),
            // Antialiasing stays off for the model view.
            Msaa::Off,
            Tonemapping::AcesFitted,
            ViewerCamera,
            Name::new("viewer_camera"),
        ))
        .id()
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        // Closing goes through the unmount path so GPU resources are released first.
        close_when_requested: false,
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        level: Level::INFO,
        filter: "wgpu=error,naga=warn".to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
