//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration and the
//! loading → running → unmounted state machine for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the app, spawns the viewer camera and lighting, and wires every plugin.
pub mod app_setup;

/// Application state machine covering load, run, failure and unmount.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
