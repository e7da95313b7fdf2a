use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::engine::scene::model::{MeshNode, ModelNode, NodeKind};

/// Texture slots released on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureSlot {
    BaseColour,
    Lightmap,
    /// Bump/parallax depth map.
    Depth,
    Normal,
    /// Specular response, stored as metallic-roughness.
    MetallicRoughness,
    Emissive,
    Occlusion,
    ClearcoatBase,
    ClearcoatRoughness,
    ClearcoatNormal,
    Anisotropy,
    SpecularTransmission,
    Thickness,
    DiffuseTransmission,
    Environment,
}

/// Every texture slot of `material` that holds an image.
pub fn material_texture_slots(material: &StandardMaterial) -> Vec<(TextureSlot, Handle<Image>)> {
    [
        (TextureSlot::BaseColour, &material.base_color_texture),
        (TextureSlot::Depth, &material.depth_map),
        (TextureSlot::Normal, &material.normal_map_texture),
        (TextureSlot::MetallicRoughness, &material.metallic_roughness_texture),
        (TextureSlot::Emissive, &material.emissive_texture),
        (TextureSlot::Occlusion, &material.occlusion_texture),
        (TextureSlot::ClearcoatBase, &material.clearcoat_texture),
        (TextureSlot::ClearcoatRoughness, &material.clearcoat_roughness_texture),
        (TextureSlot::ClearcoatNormal, &material.clearcoat_normal_texture),
        (TextureSlot::Anisotropy, &material.anisotropy_texture),
        (TextureSlot::SpecularTransmission, &material.specular_transmission_texture),
        (TextureSlot::Thickness, &material.thickness_texture),
        (TextureSlot::DiffuseTransmission, &material.diffuse_transmission_texture),
    ]
    .into_iter()
    .filter_map(|(slot, texture)| texture.clone().map(|texture| (slot, texture)))
    .collect()
}

/// Asset stores holding the model's GPU-side data.
pub struct GpuStores<'a> {
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub images: &'a mut Assets<Image>,
}

/// Counts of assets actually released. An asset already gone is not counted.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct DisposalReport {
    pub geometries: usize,
    pub materials: usize,
    pub textures: BTreeMap<TextureSlot, usize>,
}

impl DisposalReport {
    pub fn is_empty(&self) -> bool {
        self.geometries == 0 && self.materials == 0 && self.textures.is_empty()
    }

    pub fn textures_released(&self, slot: TextureSlot) -> usize {
        self.textures.get(&slot).copied().unwrap_or(0)
    }

    pub fn total_textures(&self) -> usize {
        self.textures.values().sum()
    }

    pub fn merge(&mut self, other: &DisposalReport) {
        self.geometries += other.geometries;
        self.materials += other.materials;
        for (slot, count) in &other.textures {
            *self.textures.entry(*slot).or_default() += count;
        }
    }
}

pub fn release_texture(
    slot: TextureSlot,
    texture: &Handle<Image>,
    images: &mut Assets<Image>,
    report: &mut DisposalReport,
) {
    if images.remove(texture).is_some() {
        *report.textures.entry(slot).or_default() += 1;
    }
}

/// Releases geometry, materials and material textures of every mesh node.
/// Safe to call repeatedly; later calls find nothing left to release.
pub fn dispose_model_nodes(nodes: &[ModelNode], stores: &mut GpuStores) -> DisposalReport {
    let mut report = DisposalReport::default();
    for node in nodes {
        match &node.kind {
            NodeKind::Mesh(mesh) => dispose_mesh(mesh, stores, &mut report),
            NodeKind::Group | NodeKind::Other => {}
        }
    }
    report
}

fn dispose_mesh(mesh: &MeshNode, stores: &mut GpuStores, report: &mut DisposalReport) {
    if stores.meshes.remove(&mesh.geometry).is_some() {
        report.geometries += 1;
    }
    if let Some(lightmap) = &mesh.lightmap {
        release_texture(TextureSlot::Lightmap, lightmap, stores.images, report);
    }

    for handle in mesh.materials.handles() {
        let Some(material) = stores.materials.remove(handle) else {
            continue;
        };
        report.materials += 1;
        for (slot, texture) in material_texture_slots(&material) {
            release_texture(slot, &texture, stores.images, report);
        }
    }
}
