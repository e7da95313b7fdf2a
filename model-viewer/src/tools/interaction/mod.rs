use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub mod click;
pub mod keyboard;
pub mod resize;
pub mod state;
pub mod zoom;

use click::toggle_zoom_on_click;
use keyboard::toggle_zoom_on_key;
use resize::handle_viewport_resize;
use state::{InputListeners, ZoomState, listeners_attached};
use zoom::{apply_zoom_scale, notify_zoom_change};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoomState>()
            .init_resource::<InputListeners>()
            .add_systems(
                Update,
                (
                    toggle_zoom_on_click,
                    toggle_zoom_on_key,
                    handle_viewport_resize,
                )
                    .run_if(listeners_attached),
            )
            .add_systems(
                PostUpdate,
                (apply_zoom_scale, notify_zoom_change)
                    .before(TransformSystem::TransformPropagate),
            );
    }
}
