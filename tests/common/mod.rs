//! Shared helpers for integration tests

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use fbx2glb::scene::{self, Material, Mesh, PbrMetallicRoughness, Primitive, SceneGraph, TextureInfo};
use fbx2glb::{BatchOrchestrator, ConversionError, Event, SceneConverter};
use serde_json::{Map, json};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Stands in for FBX2glTF: writes [`fixture_scene`] to the output path, or fails for the
/// configured file names
#[derive(Debug, Default)]
pub struct FakeConverter {
    failing: HashSet<String>,
    calls: Mutex<Vec<Utf8PathBuf>>,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: names.into_iter().map(Into::into).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Source paths the converter was called with, in call order
    pub fn calls(&self) -> Vec<Utf8PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl SceneConverter for FakeConverter {
    fn convert(&self, source: &Utf8Path, output: &Utf8Path) -> Result<(), ConversionError> {
        self.calls.lock().unwrap().push(source.to_path_buf());

        let name = source.file_name().unwrap_or_default();
        if self.failing.contains(name) {
            return Err(ConversionError::ExternalToolFailed {
                program: "FBX2glTF".to_string(),
                code: Some(1),
                diagnostics: format!("could not read {}", name),
            });
        }

        scene::save(&fixture_scene(), output)?;
        Ok(())
    }
}

fn textured_material(first: usize) -> Material {
    Material {
        pbr_metallic_roughness: Some(PbrMetallicRoughness {
            base_color_texture: Some(TextureInfo::new(first)),
            metallic_roughness_texture: Some(TextureInfo::new(first + 1)),
            other: Map::new(),
        }),
        normal_texture: Some(TextureInfo::new(first + 2)),
        ..Default::default()
    }
}

/// Two materials with three texture bindings each, one mesh with one primitive
pub fn fixture_scene() -> SceneGraph {
    let mut other = Map::new();
    other.insert("asset".to_string(), json!({"version": "2.0", "generator": "fake"}));
    other.insert("buffers".to_string(), json!([{"byteLength": 8}]));
    other.insert("nodes".to_string(), json!([{"mesh": 0, "name": "root"}]));

    SceneGraph {
        materials: vec![textured_material(0), textured_material(3)],
        textures: (0..6).map(|i| json!({"source": i})).collect(),
        images: (0..6)
            .map(|i| json!({"mimeType": "image/png", "bufferView": i}))
            .collect(),
        meshes: vec![Mesh {
            primitives: vec![Primitive {
                material: Some(0),
                other: Map::new(),
            }],
            other: Map::new(),
        }],
        extras: Some(json!({"exporter": "fake"})),
        other,
        binary: Some(vec![1, 2, 3, 4, 5, 6, 7, 8]),
    }
}

pub fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
}

/// Create empty source files
pub fn touch_sources(dir: &Utf8Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"FBX placeholder").unwrap();
    }
}

/// Drain events until `Done`, panicking if it doesn't arrive in time
pub fn wait_for_done(orchestrator: &BatchOrchestrator) -> Vec<Event> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();

    loop {
        while let Some(event) = orchestrator.try_next_event() {
            let done = event.is_done();
            events.push(event);
            if done {
                return events;
            }
        }
        assert!(Instant::now() < deadline, "Timeout waiting for Done: {:?}", events);
        std::thread::sleep(Duration::from_millis(5));
    }
}
