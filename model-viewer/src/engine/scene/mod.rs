//! Scene content: lighting rig and the loaded model hierarchy.

/// Directional key light with shadows plus ambient fill.
pub mod lighting;

/// Loaded model resource, node classification and scene preparation.
pub mod model;
