use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::orbit_camera::ViewerCamera;
use crate::engine::scene::model::{LoadedModel, ModelNodeQuery, NodeKind, collect_model_nodes};
use crate::tools::interaction::state::ZoomState;

/// Mesh entities of the model hierarchy under `root`.
pub fn model_mesh_entities(root: Entity, nodes: &ModelNodeQuery) -> Vec<Entity> {
    collect_model_nodes(root, nodes)
        .into_iter()
        .filter(|node| matches!(node.kind, NodeKind::Mesh(_)))
        .map(|node| node.entity)
        .collect()
}

/// Triangle-exact test of `ray` against the given model meshes only.
pub fn ray_hits_model(ray: Ray3d, model_meshes: &[Entity], ray_cast: &mut MeshRayCast) -> bool {
    if model_meshes.is_empty() {
        return false;
    }
    let filter = |entity: Entity| model_meshes.contains(&entity);
    let settings = MeshRayCastSettings {
        visibility: RayCastVisibility::Any,
        filter: &filter,
        early_exit_test: &|_| true,
    };
    !ray_cast.cast_ray(ray, &settings).is_empty()
}

/// Left press on the model geometry toggles zoom. Misses and clicks before
/// the model is loaded leave the state alone.
pub fn toggle_zoom_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<ViewerCamera>>,
    model: Option<Res<LoadedModel>>,
    nodes: ModelNodeQuery,
    mut ray_cast: MeshRayCast,
    mut zoom: ResMut<ZoomState>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(model) = model else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xf, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xf, cursor_pos) else {
        return;
    };

    let model_meshes = model_mesh_entities(model.root, &nodes);
    if ray_hits_model(ray, &model_meshes, &mut ray_cast) {
        zoom.toggle();
        debug!("Model hit at {:?}, zoomed: {}", cursor_pos, zoom.zoomed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::AssetEvent;
    use bevy::render::camera::{ManualTextureViews, camera_system};
    use bevy::render::mesh::MeshAabb;
    use bevy::render::primitives::Aabb;
    use bevy::window::{WindowCreated, WindowResized, WindowResolution, WindowScaleFactorChanged};

    use crate::engine::scene::model::ModelRoot;

    const SURFACE: Vec2 = Vec2::new(800.0, 600.0);

    /// Window, camera at `eye` looking down -Z, and the click system. The
    /// camera's viewport is computed by the engine's camera system.
    fn click_app(eye: Vec3) -> App {
        let mut app = App::new();
        app.add_event::<WindowResized>()
            .add_event::<WindowCreated>()
            .add_event::<WindowScaleFactorChanged>()
            .add_event::<AssetEvent<Image>>()
            .init_resource::<Assets<Image>>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<ManualTextureViews>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ZoomState>()
            .add_systems(Update, (camera_system, toggle_zoom_on_click).chain());

        let mut window = Window {
            resolution: WindowResolution::new(SURFACE.x, SURFACE.y),
            ..default()
        };
        window.set_cursor_position(Some(SURFACE / 2.0));
        app.world_mut().spawn((window, PrimaryWindow));

        let transform = Transform::from_translation(eye);
        app.world_mut().spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                aspect_ratio: SURFACE.x / SURFACE.y,
                ..default()
            }),
            transform,
            GlobalTransform::from(transform),
            ViewerCamera,
        ));
        app
    }

    /// Sphere of radius 0.5 at the origin under a fresh model root.
    fn spawn_sphere_model(app: &mut App) -> Entity {
        let mesh = Mesh::from(Sphere::new(0.5));
        let aabb = mesh.compute_aabb().expect("sphere has positions");
        let mesh = app.world_mut().resource_mut::<Assets<Mesh>>().add(mesh);

        let root = app.world_mut().spawn((ModelRoot, Transform::default())).id();
        app.world_mut().spawn((Mesh3d(mesh), aabb, ChildOf(root)));
        app.world_mut().insert_resource(LoadedModel {
            root,
            gltf: Handle::default(),
            scene: Handle::default(),
            animation: None,
        });
        root
    }

    fn click(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear();
    }

    fn zoomed(app: &App) -> bool {
        app.world().resource::<ZoomState>().zoomed
    }

    #[test]
    fn click_before_load_changes_nothing() {
        let mut app = click_app(Vec3::new(0.0, 0.0, 5.0));
        click(&mut app);
        assert!(!zoomed(&app));
        assert!(app.world().get_resource::<LoadedModel>().is_none());
    }

    #[test]
    fn click_on_the_model_toggles() {
        let mut app = click_app(Vec3::new(0.0, 0.0, 5.0));
        spawn_sphere_model(&mut app);

        click(&mut app);
        assert!(zoomed(&app));
        click(&mut app);
        assert!(!zoomed(&app));
    }

    #[test]
    fn click_through_bounding_box_corner_is_a_miss() {
        // Passes inside the sphere's bounds but 0.64 from its centre.
        let mut app = click_app(Vec3::new(0.45, 0.45, 5.0));
        spawn_sphere_model(&mut app);

        click(&mut app);
        assert!(!zoomed(&app));
    }

    #[test]
    fn meshes_outside_the_model_are_ignored() {
        let mut app = click_app(Vec3::new(0.0, 0.0, 5.0));
        let mesh = Mesh::from(Sphere::new(0.5));
        let aabb: Aabb = mesh.compute_aabb().expect("sphere has positions");
        let mesh = app.world_mut().resource_mut::<Assets<Mesh>>().add(mesh);
        app.world_mut().spawn((Mesh3d(mesh), aabb));

        let root = app.world_mut().spawn(ModelRoot).id();
        app.world_mut().insert_resource(LoadedModel {
            root,
            gltf: Handle::default(),
            scene: Handle::default(),
            animation: None,
        });

        click(&mut app);
        assert!(!zoomed(&app));
    }
}
