//! Asset types owned by the viewer.
//!
//! Holds the optional JSON manifest with its merged configuration, and the
//! conversion of an equirectangular panorama into a cube map for skybox and
//! image-based lighting.

/// Equirectangular → cube map conversion for environment lighting.
pub mod environment_map;

/// Optional `viewer.json` manifest and the resolved viewer configuration.
pub mod viewer_manifest;
