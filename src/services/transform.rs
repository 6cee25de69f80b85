use crate::models::ConversionOptions;
use crate::scene::SceneGraph;
use serde_json::{Map, Value};

/// Apply the batch's post-processing policy to a freshly converted scene.
///
/// Order is fixed: textures are stripped first, then materials, then metadata is merged.
/// Never fails; the loader has already validated the scene.
pub fn transform(scene: &mut SceneGraph, options: &ConversionOptions) {
    if options.remove_textures {
        strip_textures(scene);
    }

    if !options.keep_materials {
        strip_materials(scene);
    }

    if !options.custom_metadata.is_empty() {
        merge_extras(scene, options);
    }
}

/// Unbind every material texture slot, then drop the texture and image lists.
pub fn strip_textures(scene: &mut SceneGraph) {
    for material in &mut scene.materials {
        material.clear_texture_bindings();
    }

    tracing::debug!(
        "Removing {} textures and {} images",
        scene.textures.len(),
        scene.images.len()
    );
    scene.textures.clear();
    scene.images.clear();
}

/// Detach every primitive from its material, then drop the material list.
pub fn strip_materials(scene: &mut SceneGraph) {
    for primitive in scene.primitives_mut() {
        primitive.material = None;
    }

    tracing::debug!("Removing {} materials", scene.materials.len());
    scene.materials.clear();
}

/// Merge custom metadata into the scene's `extras`, overwriting matching keys.
pub fn merge_extras(scene: &mut SceneGraph, options: &ConversionOptions) {
    let extras = scene
        .extras
        .get_or_insert_with(|| Value::Object(Map::new()));

    if !extras.is_object() {
        tracing::warn!(
            "Scene extras is not an object ({}), replacing it with custom metadata",
            extras
        );
        *extras = Value::Object(Map::new());
    }

    if let Value::Object(bag) = extras {
        for (key, value) in &options.custom_metadata {
            bag.insert(key.clone(), value.clone());
        }
    }
}
