use bevy::prelude::*;

use constants::render_settings::{MODEL_NORMAL_SCALE, MODEL_ZOOMED_SCALE};

/// Whether the model is shown enlarged.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZoomState {
    pub zoomed: bool,
}

impl ZoomState {
    /// Flips the state and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.zoomed = !self.zoomed;
        self.zoomed
    }

    pub fn scale(&self) -> f32 {
        if self.zoomed {
            MODEL_ZOOMED_SCALE
        } else {
            MODEL_NORMAL_SCALE
        }
    }
}

/// Input handler registration. Cleared once on teardown.
#[derive(Resource, Debug)]
pub struct InputListeners {
    pub attached: bool,
}

impl Default for InputListeners {
    fn default() -> Self {
        Self { attached: true }
    }
}

impl InputListeners {
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

pub fn listeners_attached(listeners: Option<Res<InputListeners>>) -> bool {
    listeners.is_some_and(|listeners| listeners.attached)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_follows_toggles() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.scale(), 1.0);
        assert!(zoom.toggle());
        assert_eq!(zoom.scale(), 2.0);
        assert!(!zoom.toggle());
        assert_eq!(zoom.scale(), 1.0);
    }
}
