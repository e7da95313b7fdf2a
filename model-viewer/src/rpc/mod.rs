//! JSON-RPC 2.0 bridge to the page embedding the viewer.
//!
//! Messages travel over `postMessage` between the host page and the viewer
//! running in an iframe. Native builds compile the bridge with a no-op sender
//! so the same systems run everywhere.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Viewer (iframe)
//!        │                                     │
//!        ├─ Request (with ID) ───────────────> │
//!        │                                     ├─ Dispatch to handler
//!        │ <──────────────── Response (with ID)┤
//!        │                                     │
//!        │ <───────────── Notification (no ID)─┤
//! ```
//!
//! Requests without an ID are still executed; they just get no response.
//!
//! ## Methods
//!
//! - `get_view_state`: lifecycle state, load stage, zoom and surface size
//! - `toggle_zoom`: flip the zoom state, returns the new value
//! - `set_zoom`: `{ "zoomed": bool }`
//! - `get_fps`: smoothed frame rate
//! - `unmount`: tear the view down and release GPU resources
//!
//! ## Notifications
//!
//! - `load_stage`: `{ "stage" }` whenever the load sequence advances
//! - `model_loaded`: `{ "model" }` once the model is in the scene
//! - `load_failed`: `{ "stage", "message" }`
//! - `zoom_changed`: `{ "zoomed", "scale" }`
//! - `fps_update`: `{ "fps" }` twice a second
//! - `unmounted`: final message, carries the disposal counts
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params

/// Request dispatch, notification queue and the wasm message listener.
pub mod web_rpc;
