use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use std::f32::consts::{PI, TAU};

use constants::render_settings::ENVIRONMENT_MIN_FACE_SIZE;

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentMapError {
    #[error("panorama has zero size")]
    Empty,
    #[error("panorama pixel ({x}, {y}) cannot be read: {reason}")]
    Unreadable { x: u32, y: u32, reason: String },
    #[error("cube face pixel ({x}, {y}) cannot be written: {reason}")]
    Unwritable { x: u32, y: u32, reason: String },
}

/// Cube faces in GPU layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// World direction through face coordinates `u`, `v` in `[-1, 1]`, `v` growing downwards.
    pub fn direction(self, u: f32, v: f32) -> Vec3 {
        match self {
            Self::PositiveX => Vec3::new(1.0, -v, -u),
            Self::NegativeX => Vec3::new(-1.0, -v, u),
            Self::PositiveY => Vec3::new(u, 1.0, v),
            Self::NegativeY => Vec3::new(u, -1.0, -v),
            Self::PositiveZ => Vec3::new(u, -v, 1.0),
            Self::NegativeZ => Vec3::new(-u, -v, -1.0),
        }
        .normalize()
    }
}

/// Pixel of a `width` × `height` equirectangular image seen along `direction`.
pub fn equirect_pixel(direction: Vec3, width: u32, height: u32) -> UVec2 {
    let u = direction.z.atan2(direction.x) / TAU + 0.5;
    let v = direction.y.clamp(-1.0, 1.0).asin() / PI + 0.5;

    let x = ((u * width as f32) as u32).min(width.saturating_sub(1));
    let y = (((1.0 - v) * height as f32) as u32).min(height.saturating_sub(1));
    UVec2::new(x, y)
}

/// Face edge length for a panorama of the given width, capped at `max_face_size`.
pub fn cube_face_size(panorama_width: u32, max_face_size: u32) -> u32 {
    (panorama_width / 4).clamp(ENVIRONMENT_MIN_FACE_SIZE, max_face_size.max(ENVIRONMENT_MIN_FACE_SIZE))
}

/// Resamples the panorama into six faces stacked vertically in a single 2D image.
pub fn render_cube_faces(panorama: &Image, max_face_size: u32) -> Result<Image, EnvironmentMapError> {
    let (width, height) = (panorama.width(), panorama.height());
    if width == 0 || height == 0 {
        return Err(EnvironmentMapError::Empty);
    }

    let face_size = cube_face_size(width, max_face_size);
    let mut faces = Image::new_fill(
        Extent3d {
            width: face_size,
            height: face_size * CubeFace::ALL.len() as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0; 16],
        TextureFormat::Rgba32Float,
        RenderAssetUsages::RENDER_WORLD,
    );

    for (layer, face) in CubeFace::ALL.into_iter().enumerate() {
        let row_offset = layer as u32 * face_size;
        for y in 0..face_size {
            for x in 0..face_size {
                let u = 2.0 * (x as f32 + 0.5) / face_size as f32 - 1.0;
                let v = 2.0 * (y as f32 + 0.5) / face_size as f32 - 1.0;
                let source = equirect_pixel(face.direction(u, v), width, height);

                let colour = panorama.get_color_at(source.x, source.y).map_err(|err| {
                    EnvironmentMapError::Unreadable {
                        x: source.x,
                        y: source.y,
                        reason: format!("{err:?}"),
                    }
                })?;
                faces
                    .set_color_at(x, row_offset + y, colour)
                    .map_err(|err| EnvironmentMapError::Unwritable {
                        x,
                        y: row_offset + y,
                        reason: format!("{err:?}"),
                    })?;
            }
        }
    }

    Ok(faces)
}

/// Converts an equirectangular panorama into a cube map usable by
/// `Skybox` and `EnvironmentMapLight`.
pub fn equirect_to_cubemap(panorama: &Image, max_face_size: u32) -> Result<Image, EnvironmentMapError> {
    let mut cube = render_cube_faces(panorama, max_face_size)?;
    cube.reinterpret_stacked_2d_as_array(CubeFace::ALL.len() as u32);
    cube.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(cube)
}
