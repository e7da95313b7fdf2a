use bevy::prelude::*;

use crate::engine::scene::model::{LoadedModel, ModelRoot};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::interaction::state::ZoomState;

/// Scales the model root to match `ZoomState`. Does nothing until a model
/// is loaded; a model arriving later picks up the current state.
pub fn apply_zoom_scale(
    zoom: Res<ZoomState>,
    model: Option<Res<LoadedModel>>,
    mut roots: Query<&mut Transform, With<ModelRoot>>,
) {
    let Some(model) = model else {
        return;
    };
    if !zoom.is_changed() && !model.is_changed() {
        return;
    }
    if let Ok(mut transform) = roots.get_mut(model.root) {
        transform.scale = Vec3::splat(zoom.scale());
    }
}

pub fn notify_zoom_change(
    zoom: Res<ZoomState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_zoomed: Local<bool>,
) {
    if zoom.zoomed == *last_zoomed {
        return;
    }
    *last_zoomed = zoom.zoomed;
    info!("Zoom {}", if zoom.zoomed { "on" } else { "off" });
    rpc_interface.send_notification(
        "zoom_changed",
        serde_json::json!({ "zoomed": zoom.zoomed, "scale": zoom.scale() }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom_app() -> App {
        let mut app = App::new();
        app.init_resource::<ZoomState>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, (apply_zoom_scale, notify_zoom_change));
        app
    }

    fn spawn_model(app: &mut App) -> Entity {
        let root = app.world_mut().spawn((ModelRoot, Transform::default())).id();
        app.world_mut().insert_resource(LoadedModel {
            root,
            gltf: Handle::default(),
            scene: Handle::default(),
            animation: None,
        });
        root
    }

    #[test]
    fn toggles_before_load_do_nothing() {
        let mut app = zoom_app();
        for _ in 0..3 {
            app.world_mut().resource_mut::<ZoomState>().toggle();
            app.update();
        }
        assert!(app.world().get_resource::<LoadedModel>().is_none());

        let root = spawn_model(&mut app);
        app.update();
        // Three toggles left the view zoomed; the late model adopts that.
        let transform = app.world().get::<Transform>(root).expect("root transform");
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn even_toggles_return_to_unit_scale() {
        let mut app = zoom_app();
        let root = spawn_model(&mut app);
        app.update();

        for toggles in 1..=6 {
            app.world_mut().resource_mut::<ZoomState>().toggle();
            app.update();
            let scale = app.world().get::<Transform>(root).expect("root transform").scale;
            let expected = if toggles % 2 == 0 { 1.0 } else { 2.0 };
            assert_eq!(scale, Vec3::splat(expected));
        }
    }

    #[test]
    fn zoom_changes_are_reported_once() {
        let mut app = zoom_app();
        app.world_mut().resource_mut::<ZoomState>().toggle();
        app.update();
        app.update();

        let sent = app.world().resource::<WebRpcInterface>().queued_notifications();
        assert_eq!(sent.iter().filter(|n| n.method == "zoom_changed").count(), 1);
    }
}
