use bevy::prelude::*;

/// Render surface and projection state for the mounted view.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportContext {
    /// Logical size of the render surface.
    pub surface_size: Vec2,
    /// Device pixel ratio applied to the surface.
    pub scale_factor: f32,
    pub camera: Option<Entity>,
    pub surface_attached: bool,
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self {
            surface_size: Vec2::new(1280.0, 720.0),
            scale_factor: 1.0,
            camera: None,
            surface_attached: false,
        }
    }
}

impl ViewportContext {
    pub fn from_window(window: &Window) -> Self {
        Self {
            surface_size: Vec2::new(window.width(), window.height()),
            scale_factor: window.resolution.scale_factor(),
            ..default()
        }
    }

    pub fn attach(&mut self, camera: Entity) {
        self.camera = Some(camera);
        self.surface_attached = true;
    }

    pub fn aspect(&self) -> f32 {
        if self.surface_size.y > 0.0 {
            self.surface_size.x / self.surface_size.y
        } else {
            1.0
        }
    }

    /// Size of the backing surface in physical pixels.
    pub fn physical_size(&self) -> UVec2 {
        (self.surface_size * self.scale_factor).round().as_uvec2()
    }

    /// Records a new surface size. Degenerate sizes (minimised windows) are ignored.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        self.surface_size = Vec2::new(width, height);
        true
    }
}
