//! Per-frame systems for the mounted view.

/// Diagnostics forwarding to the host page.
pub mod fps_tracking;

/// Cancellable frame loop: delta, animation, controls, render.
///
/// Owns the ordering of the orbit controller relative to animation and
/// transform propagation.
pub mod frame_loop;
