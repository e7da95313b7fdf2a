use bevy::app::Animation;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::engine::camera::orbit_camera::orbit_camera_controller;
use crate::engine::systems::fps_tracking::fps_notification_system;

/// Scheduling handle for the per-frame work of the view.
///
/// While `active`, every frame records the delta, advances animation, then
/// integrates the orbit controls before the engine renders. Clearing
/// `active` stops all of it; the engine keeps presenting whatever is left.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FrameLoop {
    pub active: bool,
    pub frames: u64,
    /// Seconds since the previous frame.
    pub last_delta: f32,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self {
            active: true,
            frames: 0,
            last_delta: 0.0,
        }
    }
}

impl FrameLoop {
    pub fn cancel(&mut self) {
        if self.active {
            info!("Frame loop cancelled after {} frames", self.frames);
        }
        self.active = false;
    }
}

/// Run condition for everything driven by the frame loop.
pub fn frame_loop_active(frame_loop: Option<Res<FrameLoop>>) -> bool {
    frame_loop.is_some_and(|frame_loop| frame_loop.active)
}

pub fn tick_frame_loop(time: Res<Time>, mut frame_loop: ResMut<FrameLoop>) {
    frame_loop.frames += 1;
    frame_loop.last_delta = time.delta_secs();
}

pub struct FrameLoopPlugin;

impl Plugin for FrameLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameLoop>()
            .configure_sets(PostUpdate, Animation.run_if(frame_loop_active))
            .add_systems(First, tick_frame_loop.run_if(frame_loop_active))
            .add_systems(
                PostUpdate,
                orbit_camera_controller
                    .run_if(frame_loop_active)
                    .after(Animation)
                    .before(TransformSystem::TransformPropagate),
            )
            .add_systems(Update, fps_notification_system.run_if(frame_loop_active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn loop_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<FrameLoop>()
            .add_systems(First, tick_frame_loop.run_if(frame_loop_active));
        app
    }

    #[test]
    fn each_update_is_one_frame() {
        let mut app = loop_app();
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(app.world().resource::<FrameLoop>().frames, 5);
    }

    #[test]
    fn cancelled_loop_stops_ticking() {
        let mut app = loop_app();
        app.update();
        app.world_mut().resource_mut::<FrameLoop>().cancel();
        app.update();
        app.update();

        let frame_loop = app.world().resource::<FrameLoop>();
        assert!(!frame_loop.active);
        assert_eq!(frame_loop.frames, 1);
    }

    #[test]
    fn condition_is_false_without_a_loop() {
        let mut world = World::new();
        let active = world
            .run_system_once(frame_loop_active)
            .expect("condition runs");
        assert!(!active);
    }
}
