//! Scene graph model for binary glTF (GLB) files.
//!
//! Only the parts of the glTF root that the post-processing transform touches are typed:
//! - [`Material`] with its PBR block and texture bindings
//! - [`Mesh`] / [`Primitive`] material references
//! - the root `textures`, `images` and `extras` entries
//!
//! Every other property (nodes, accessors, buffer views, samplers, extensions, ...) is kept as
//! raw JSON in the `other` maps and written back untouched, so a load/save cycle only changes
//! what the transform changes.
//!
//! The GLB container itself is handled by [`glb`].

pub mod glb;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use glb::{SceneError, load, save};

/// In-memory glTF root plus the binary buffer chunk of a GLB file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,

    /// Application-specific metadata bag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Value>,

    #[serde(flatten)]
    pub other: Map<String, Value>,

    /// Payload of the GLB `BIN` chunk, if present
    #[serde(skip)]
    pub binary: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<TextureInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<TextureInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<TextureInfo>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Material {
    /// Clear every texture binding on this material.
    pub fn clear_texture_bindings(&mut self) {
        if let Some(pbr) = self.pbr_metallic_roughness.as_mut() {
            pbr.base_color_texture = None;
            pbr.metallic_roughness_texture = None;
        }
        self.normal_texture = None;
        self.occlusion_texture = None;
        self.emissive_texture = None;
    }

    /// Number of texture bindings currently set
    pub fn texture_binding_count(&self) -> usize {
        let pbr = self
            .pbr_metallic_roughness
            .as_ref()
            .map(|p| {
                usize::from(p.base_color_texture.is_some())
                    + usize::from(p.metallic_roughness_texture.is_some())
            })
            .unwrap_or(0);

        pbr + usize::from(self.normal_texture.is_some())
            + usize::from(self.occlusion_texture.is_some())
            + usize::from(self.emissive_texture.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<TextureInfo>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Reference from a material slot to an entry in the root `textures` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub index: usize,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TextureInfo {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            other: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub primitives: Vec<Primitive>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SceneGraph {
    /// Parse a glTF JSON document.
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(json)
    }

    /// Serialize the glTF JSON document (without the binary chunk).
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Iterate over every mesh primitive in the scene
    pub fn primitives_mut(&mut self) -> impl Iterator<Item = &mut Primitive> {
        self.meshes
            .iter_mut()
            .flat_map(|mesh| mesh.primitives.iter_mut())
    }
}
