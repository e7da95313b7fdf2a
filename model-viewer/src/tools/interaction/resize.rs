use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::engine::camera::orbit_camera::ViewerCamera;
use crate::engine::camera::viewport::ViewportContext;

/// Applies a new surface size to the viewport and the camera projection.
/// Zero or negative sizes leave both untouched.
pub fn resize_viewport(
    viewport: &mut ViewportContext,
    projection: &mut Projection,
    width: f32,
    height: f32,
) -> bool {
    if !viewport.resize(width, height) {
        return false;
    }
    if let Projection::Perspective(perspective) = projection {
        perspective.aspect_ratio = width / height;
    }
    true
}

pub fn handle_viewport_resize(
    mut resize_events: EventReader<WindowResized>,
    viewport: Option<ResMut<ViewportContext>>,
    mut cameras: Query<&mut Projection, With<ViewerCamera>>,
) {
    let (Some(mut viewport), Ok(mut projection)) = (viewport, cameras.single_mut()) else {
        resize_events.clear();
        return;
    };

    for event in resize_events.read() {
        if resize_viewport(&mut viewport, &mut projection, event.width, event.height) {
            debug!("Viewport resized to {}x{}", event.width, event.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perspective(projection: &Projection) -> &PerspectiveProjection {
        match projection {
            Projection::Perspective(perspective) => perspective,
            _ => panic!("expected a perspective projection"),
        }
    }

    #[test]
    fn resize_sets_aspect_and_surface() {
        let mut viewport = ViewportContext::default();
        let mut projection = Projection::Perspective(PerspectiveProjection::default());

        for (width, height) in [(800.0, 600.0), (1.0, 1000.0), (1920.0, 1080.0)] {
            assert!(resize_viewport(&mut viewport, &mut projection, width, height));
            assert_eq!(perspective(&projection).aspect_ratio, width / height);
            assert_eq!(viewport.surface_size, Vec2::new(width, height));
        }
    }

    #[test]
    fn zero_sizes_are_ignored() {
        let mut viewport = ViewportContext::default();
        let mut projection = Projection::Perspective(PerspectiveProjection::default());
        let before = perspective(&projection).aspect_ratio;

        assert!(!resize_viewport(&mut viewport, &mut projection, 0.0, 0.0));
        assert_eq!(perspective(&projection).aspect_ratio, before);
        assert_eq!(viewport.surface_size, Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn window_events_reach_the_camera() {
        let mut app = App::new();
        app.add_event::<WindowResized>()
            .insert_resource(ViewportContext::default())
            .add_systems(Update, handle_viewport_resize);
        let camera = app
            .world_mut()
            .spawn((
                ViewerCamera,
                Projection::Perspective(PerspectiveProjection::default()),
            ))
            .id();

        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 800.0,
            height: 400.0,
        });
        app.update();

        let projection = app.world().get::<Projection>(camera).expect("camera projection");
        assert_eq!(perspective(projection).aspect_ratio, 2.0);
        assert_eq!(
            app.world().resource::<ViewportContext>().surface_size,
            Vec2::new(800.0, 400.0)
        );
    }

    #[test]
    fn resize_without_camera_is_a_no_op() {
        let mut app = App::new();
        app.add_event::<WindowResized>()
            .insert_resource(ViewportContext::default())
            .add_systems(Update, handle_viewport_resize);

        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 800.0,
            height: 400.0,
        });
        app.update();

        assert_eq!(
            app.world().resource::<ViewportContext>().surface_size,
            Vec2::new(1280.0, 720.0)
        );
    }
}
