//! Shared configuration constants for the model viewer.

/// Asset file names and mount-point selectors.
pub mod path;

/// Camera, lighting and interaction tuning values.
pub mod render_settings;
