use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::viewer_manifest::ViewerManifest;

/// Stages of the load sequence, strictly in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadStage {
    #[default]
    Manifest,
    Environment,
    Model,
    Complete,
    Failed,
}

impl LoadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Environment => "environment",
            Self::Model => "model",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

/// Progress of the asynchronous load sequence for the mounted view.
#[derive(Resource, Default)]
pub struct LoadSequence {
    pub stage: LoadStage,
    /// Set on unmount. Results resolving afterwards are dropped untouched.
    pub cancelled: bool,
    pub manifest: Option<Handle<ViewerManifest>>,
    /// Source panorama as fetched.
    pub environment: Option<Handle<Image>>,
    /// Cube map built from the panorama, bound to the camera.
    pub environment_map: Option<Handle<Image>>,
    pub model: Option<Handle<Gltf>>,
    /// Stages in the order their fetch was issued.
    pub requested: Vec<LoadStage>,
}

impl LoadSequence {
    pub fn is_live(&self) -> bool {
        !self.cancelled
    }

    /// Records a fetch for `stage` and makes it the current stage.
    pub fn begin(&mut self, stage: LoadStage) {
        self.requested.push(stage);
        self.stage = stage;
    }

    /// Stops the sequence and releases in-flight handles so the server can drop them.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.manifest = None;
        if self.stage != LoadStage::Complete {
            self.model = None;
        }
    }
}

/// Outcome of polling one asset handle.
pub enum AssetResolution<'a, A> {
    Pending,
    Ready(&'a A),
    Failed(String),
}

pub fn resolve<'a, A: Asset>(
    handle: &Handle<A>,
    assets: &'a Assets<A>,
    asset_server: &AssetServer,
) -> AssetResolution<'a, A> {
    if let Some(asset) = assets.get(handle) {
        return AssetResolution::Ready(asset);
    }
    match asset_server.get_load_state(handle) {
        Some(LoadState::Failed(err)) => AssetResolution::Failed(err.to_string()),
        _ => AssetResolution::Pending,
    }
}
