//! Integration tests for the scene transform against the GLB codec
//!
//! These tests verify:
//! - Texture stripping unbinds every slot and empties textures/images
//! - Material stripping detaches primitives and empties materials
//! - Metadata merge into extras
//! - Properties the transform doesn't own survive a load/transform/save cycle

mod common;

use common::{fixture_scene, utf8_dir};
use fbx2glb::ConversionOptions;
use fbx2glb::models::CustomMetadata;
use fbx2glb::scene::{self, SceneGraph};
use fbx2glb::services::transform;
use serde_json::{Value, json};
use tempfile::TempDir;

fn metadata(value: Value) -> CustomMetadata {
    serde_json::from_value(value).unwrap()
}

fn options(keep_materials: bool, remove_textures: bool, custom: Value) -> ConversionOptions {
    ConversionOptions {
        keep_materials,
        remove_textures,
        custom_metadata: metadata(custom),
    }
}

fn round_trip(scene: &SceneGraph) -> SceneGraph {
    let dir = TempDir::new().unwrap();
    let path = utf8_dir(&dir).join("scene.glb");
    scene::save(scene, &path).unwrap();
    scene::load(&path).unwrap()
}

#[test]
fn test_texture_stripping_on_fixture() {
    let mut scene = fixture_scene();
    assert_eq!(
        scene
            .materials
            .iter()
            .map(|m| m.texture_binding_count())
            .sum::<usize>(),
        6
    );

    transform(&mut scene, &options(true, true, json!({})));
    let scene = round_trip(&scene);

    assert_eq!(scene.materials.len(), 2);
    assert!(scene.materials.iter().all(|m| m.texture_binding_count() == 0));
    assert!(scene.textures.is_empty());
    assert!(scene.images.is_empty());
    assert_eq!(scene.meshes[0].primitives[0].material, Some(0));
}

#[test]
fn test_material_stripping_on_fixture() {
    let mut scene = fixture_scene();

    transform(&mut scene, &options(false, false, json!({})));
    let scene = round_trip(&scene);

    assert!(scene.materials.is_empty());
    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].primitives.len(), 1);
    assert_eq!(scene.meshes[0].primitives[0].material, None);
}

#[test]
fn test_metadata_merge_semantics() {
    let mut scene = SceneGraph {
        extras: Some(json!({"a": 1})),
        ..Default::default()
    };
    transform(&mut scene, &options(true, false, json!({"b": 2})));
    assert_eq!(scene.extras, Some(json!({"a": 1, "b": 2})));

    let mut scene = SceneGraph {
        extras: Some(json!({"a": 1})),
        ..Default::default()
    };
    transform(&mut scene, &options(true, false, json!({"a": 3})));
    assert_eq!(scene.extras, Some(json!({"a": 3})));
}

#[test]
fn test_untouched_properties_survive() {
    let mut scene = fixture_scene();

    transform(
        &mut scene,
        &options(false, true, json!({"origin": "origin_pack_name"})),
    );
    let scene = round_trip(&scene);

    assert_eq!(scene.other["asset"], json!({"version": "2.0", "generator": "fake"}));
    assert_eq!(scene.other["nodes"], json!([{"mesh": 0, "name": "root"}]));
    assert_eq!(scene.binary, Some(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(
        scene.extras,
        Some(json!({"exporter": "fake", "origin": "origin_pack_name"}))
    );
}

#[test]
fn test_transform_is_idempotent() {
    let opts = options(false, true, json!({"origin": "pack"}));

    let mut once = fixture_scene();
    transform(&mut once, &opts);

    let mut twice = once.clone();
    transform(&mut twice, &opts);

    assert_eq!(once, twice);
    assert_eq!(scene::glb::to_vec(&once).unwrap(), scene::glb::to_vec(&twice).unwrap());
}
