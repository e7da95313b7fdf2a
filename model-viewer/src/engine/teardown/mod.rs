//! Unmount handling and explicit release of GPU-side resources.
//!
//! Teardown runs once, on entering `AppState::Unmounted`, in a fixed order:
//!
//! 1. cancel the frame loop and any pending loads
//! 2. detach input listeners
//! 3. detach and dispose the render surface
//! 4. stop the animation driver
//! 5. dispose model geometry, materials and textures
//! 6. release the environment map
//! 7. notify the host and exit

use bevy::prelude::*;
use bevy::window::WindowCloseRequested;

use crate::engine::core::app_state::AppState;

/// Pure disposal of a collected model hierarchy.
pub mod disposal;

/// The ordered teardown systems.
pub mod systems;

use disposal::DisposalReport;
use systems::{
    cancel_pending_work, detach_input_listeners, detach_render_surface, dispose_model,
    finish_unmount, release_environment_map, stop_animation_driver,
};

/// Asks the view to unmount. Sent by the host bridge or on window close.
#[derive(Event, Debug, Clone, Copy)]
pub struct UnmountRequest;

pub struct TeardownPlugin;

impl Plugin for TeardownPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<UnmountRequest>()
            .init_resource::<DisposalReport>()
            .add_systems(Update, (forward_close_requests, enter_unmounted).chain())
            .add_systems(
                OnEnter(AppState::Unmounted),
                (
                    cancel_pending_work,
                    detach_input_listeners,
                    detach_render_surface,
                    stop_animation_driver,
                    dispose_model,
                    release_environment_map,
                    finish_unmount,
                )
                    .chain(),
            );
    }
}

fn forward_close_requests(
    mut close_requests: EventReader<WindowCloseRequested>,
    mut unmount: EventWriter<UnmountRequest>,
) {
    if close_requests.read().count() > 0 {
        unmount.write(UnmountRequest);
    }
}

pub fn enter_unmounted(
    mut requests: EventReader<UnmountRequest>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 || *state.get() == AppState::Unmounted {
        return;
    }
    info!("Unmounting from {}", state.get().as_str());
    next_state.set(AppState::Unmounted);
}
