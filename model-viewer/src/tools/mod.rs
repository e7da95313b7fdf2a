//! User-facing tools for the mounted view.
//!
//! ## Interaction
//!
//! Handlers are gated on `InputListeners::attached`, which teardown clears
//! before the render surface goes away:
//!
//! - **Click**: left press casts a ray from the cursor; hitting any model
//!   mesh toggles zoom. Misses and clicks before the model loads do nothing.
//! - **`M` key**: toggles zoom, case-insensitive, modifiers ignored.
//! - **Resize**: keeps the camera aspect and the recorded surface size in
//!   step with the window.
//!
//! The zoom effect itself runs every frame and scales the model root to
//! 2× or 1×. The host can also drive zoom through the `toggle_zoom` and
//! `set_zoom` RPC methods.

/// Zoom toggling and viewport resize handlers.
pub mod interaction;
