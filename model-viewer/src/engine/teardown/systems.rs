use bevy::prelude::*;

#[cfg(target_arch = "wasm32")]
use constants::path::CANVAS_SELECTOR;

use crate::engine::camera::viewport::ViewportContext;
use crate::engine::loading::progress::LoadSequence;
use crate::engine::scene::model::{LoadedModel, ModelNodeQuery, collect_model_nodes};
use crate::engine::systems::frame_loop::FrameLoop;
use crate::engine::teardown::disposal::{
    DisposalReport, GpuStores, TextureSlot, dispose_model_nodes, release_texture,
};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::interaction::state::InputListeners;

pub fn cancel_pending_work(
    frame_loop: Option<ResMut<FrameLoop>>,
    sequence: Option<ResMut<LoadSequence>>,
) {
    if let Some(mut frame_loop) = frame_loop {
        frame_loop.cancel();
    }
    if let Some(mut sequence) = sequence {
        sequence.cancel();
    }
}

pub fn detach_input_listeners(listeners: Option<ResMut<InputListeners>>) {
    if let Some(mut listeners) = listeners {
        listeners.detach();
    }
}

/// Drops the camera that renders into the surface and, on the web, removes
/// the canvas element from the page.
pub fn detach_render_surface(mut commands: Commands, viewport: Option<ResMut<ViewportContext>>) {
    let Some(mut viewport) = viewport else {
        return;
    };
    if let Some(camera) = viewport.camera.take() {
        commands.entity(camera).try_despawn();
    }
    if viewport.surface_attached {
        viewport.surface_attached = false;
        #[cfg(target_arch = "wasm32")]
        remove_canvas_element();
        debug!("Render surface detached");
    }
}

#[cfg(target_arch = "wasm32")]
fn remove_canvas_element() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(canvas)) => canvas.remove(),
        Ok(None) => {}
        Err(e) => warn!("Canvas lookup failed: {:?}", e),
    }
}

pub fn stop_animation_driver(
    model: Option<Res<LoadedModel>>,
    nodes: ModelNodeQuery,
    mut players: Query<&mut AnimationPlayer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    let Some(model) = model else {
        return;
    };
    for node in collect_model_nodes(model.root, &nodes) {
        if let Ok(mut player) = players.get_mut(node.entity) {
            player.stop_all();
        }
    }
    if let Some(driver) = &model.animation {
        graphs.remove(&driver.graph);
    }
}

pub fn dispose_model(
    mut commands: Commands,
    model: Option<Res<LoadedModel>>,
    nodes: ModelNodeQuery,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut report: ResMut<DisposalReport>,
) {
    let Some(model) = model else {
        return;
    };

    let hierarchy = collect_model_nodes(model.root, &nodes);
    let released = dispose_model_nodes(
        &hierarchy,
        &mut GpuStores {
            meshes: &mut meshes,
            materials: &mut materials,
            images: &mut images,
        },
    );
    info!(
        "Model disposed: {} geometries, {} materials, {} textures",
        released.geometries,
        released.materials,
        released.total_textures()
    );
    report.merge(&released);

    commands.entity(model.root).try_despawn();
    commands.remove_resource::<LoadedModel>();
}

pub fn release_environment_map(
    sequence: Option<ResMut<LoadSequence>>,
    mut images: ResMut<Assets<Image>>,
    mut report: ResMut<DisposalReport>,
) {
    let Some(mut sequence) = sequence else {
        return;
    };
    let mut released = DisposalReport::default();
    for texture in [sequence.environment_map.take(), sequence.environment.take()]
        .into_iter()
        .flatten()
    {
        release_texture(TextureSlot::Environment, &texture, &mut images, &mut released);
    }
    report.merge(&released);
}

pub fn finish_unmount(
    report: Res<DisposalReport>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut exit: EventWriter<AppExit>,
) {
    if report.is_empty() {
        info!("✓ Viewer unmounted, nothing to release");
    } else {
        info!("✓ Viewer unmounted");
    }
    rpc_interface.send_notification(
        "unmounted",
        serde_json::json!({
            "geometries": report.geometries,
            "materials": report.materials,
            "textures": report.total_textures(),
            "environment": report.textures_released(TextureSlot::Environment),
        }),
    );
    exit.write(AppExit::Success);
}
