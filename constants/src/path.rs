/// Optional JSON manifest that may override the asset paths below.
pub const VIEWER_MANIFEST_PATH: &str = "viewer.json";

/// Equirectangular HDR panorama used as background and image-based light.
pub const ENVIRONMENT_TEXTURE_PATH: &str = "skyes.hdr";

/// Binary glTF model shown in the viewport.
pub const MODEL_PATH: &str = "model.glb";

/// Canvas element the wasm build renders into.
pub const CANVAS_SELECTOR: &str = "#viewer";
