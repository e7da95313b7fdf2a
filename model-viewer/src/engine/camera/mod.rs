//! Viewer camera and viewport state.
//!
//! Provides a damped orbit controller around a focus point and the viewport
//! context that tracks the render surface size and device pixel ratio.

/// Damped orbit controller resource and the system that drives the camera.
pub mod orbit_camera;

/// Render surface dimensions, pixel ratio and camera attachment.
pub mod viewport;
