use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::tools::interaction::state::ZoomState;

/// `m` or `M` by logical key, so layout and shift state are respected.
pub fn is_zoom_key(key: &Key) -> bool {
    matches!(key, Key::Character(character) if character.eq_ignore_ascii_case("m"))
}

pub fn toggle_zoom_on_key(mut keys: EventReader<KeyboardInput>, mut zoom: ResMut<ZoomState>) {
    for event in keys.read() {
        if event.state == ButtonState::Pressed && is_zoom_key(&event.logical_key) {
            zoom.toggle();
            debug!("Zoom key pressed, zoomed: {}", zoom.zoomed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(character: &str, state: ButtonState) -> KeyboardInput {
        KeyboardInput {
            key_code: KeyCode::KeyM,
            logical_key: Key::Character(character.into()),
            state,
            text: None,
            repeat: false,
            window: Entity::PLACEHOLDER,
        }
    }

    #[test]
    fn either_case_of_m_is_the_zoom_key() {
        assert!(is_zoom_key(&Key::Character("m".into())));
        assert!(is_zoom_key(&Key::Character("M".into())));
        assert!(!is_zoom_key(&Key::Character("n".into())));
        assert!(!is_zoom_key(&Key::Enter));
    }

    #[test]
    fn presses_toggle_and_releases_do_not() {
        let mut app = App::new();
        app.add_event::<KeyboardInput>()
            .init_resource::<ZoomState>()
            .add_systems(Update, toggle_zoom_on_key);

        app.world_mut().send_event(key_event("M", ButtonState::Pressed));
        app.world_mut().send_event(key_event("M", ButtonState::Released));
        app.update();
        assert!(app.world().resource::<ZoomState>().zoomed);

        app.world_mut().send_event(key_event("m", ButtonState::Pressed));
        app.update();
        assert!(!app.world().resource::<ZoomState>().zoomed);
    }
}
