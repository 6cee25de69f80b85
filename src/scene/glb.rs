// GLB container codec
//
// The binary container (header, JSON chunk, optional BIN chunk) is handled by `gltf::binary`.
// The JSON chunk is parsed into our own SceneGraph so properties we don't model survive a rewrite.

use super::SceneGraph;
use camino::Utf8Path;
use gltf::binary::{Glb, Header};
use std::borrow::Cow;
use std::fs;
use thiserror::Error;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Errors raised while reading or writing a GLB scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GLB container: {0}")]
    Glb(#[from] gltf::Error),

    #[error("Invalid glTF JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a GLB file from disk.
pub fn load(path: &Utf8Path) -> Result<SceneGraph, SceneError> {
    let bytes = fs::read(path).map_err(|source| SceneError::Io {
        path: path.to_string(),
        source,
    })?;
    let scene = from_slice(&bytes)?;

    tracing::debug!(
        "Loaded {}: {} materials, {} textures, {} images, {} meshes",
        path,
        scene.materials.len(),
        scene.textures.len(),
        scene.images.len(),
        scene.meshes.len()
    );

    Ok(scene)
}

/// Write a scene to disk as GLB, replacing any existing file.
pub fn save(scene: &SceneGraph, path: &Utf8Path) -> Result<(), SceneError> {
    let bytes = to_vec(scene)?;
    fs::write(path, &bytes).map_err(|source| SceneError::Io {
        path: path.to_string(),
        source,
    })?;

    tracing::debug!("Saved {} ({} bytes)", path, bytes.len());
    Ok(())
}

/// Decode a GLB byte buffer.
pub fn from_slice(bytes: &[u8]) -> Result<SceneGraph, SceneError> {
    let glb = Glb::from_slice(bytes)?;

    let mut scene = SceneGraph::from_json(&glb.json)?;
    scene.binary = glb.bin.map(Cow::into_owned);

    Ok(scene)
}

/// Encode a scene as a GLB byte buffer.
pub fn to_vec(scene: &SceneGraph) -> Result<Vec<u8>, SceneError> {
    let mut json = scene.to_json()?;
    pad_to_four(&mut json, b' ');

    let mut bin = scene.binary.clone();
    if let Some(bin) = bin.as_mut() {
        pad_to_four(bin, 0);
    }

    let length = HEADER_LEN
        + CHUNK_HEADER_LEN
        + json.len()
        + bin.as_ref().map_or(0, |bin| CHUNK_HEADER_LEN + bin.len());

    let glb = Glb {
        header: Header {
            magic: *b"glTF",
            version: 2,
            length: u32::try_from(length).unwrap_or(u32::MAX),
        },
        json: Cow::Owned(json),
        bin: bin.map(Cow::Owned),
    };

    Ok(glb.to_vec()?)
}

fn pad_to_four(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_scene() -> SceneGraph {
        let doc = json!({
            "asset": {"version": "2.0"},
            "buffers": [{"byteLength": 5}],
            "materials": [{"name": "Skin"}],
            "extras": {"a": 1}
        });
        let mut scene = SceneGraph::from_json(&serde_json::to_vec(&doc).unwrap()).unwrap();
        scene.binary = Some(vec![1, 2, 3, 4, 5]);
        scene
    }

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_encoded_layout_is_aligned() {
        let bytes = to_vec(&sample_scene()).unwrap();

        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(read_u32(&bytes, 4), 2);
        assert_eq!(read_u32(&bytes, 8) as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);

        let json_len = read_u32(&bytes, 12) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&bytes[16..20], b"JSON");

        let bin_header = HEADER_LEN + CHUNK_HEADER_LEN + json_len;
        assert_eq!(&bytes[bin_header + 4..bin_header + 8], b"BIN\0");
    }

    #[test]
    fn test_decode_restores_json_and_binary() {
        let scene = sample_scene();
        let decoded = from_slice(&to_vec(&scene).unwrap()).unwrap();

        assert_eq!(decoded.materials, scene.materials);
        assert_eq!(decoded.extras, Some(json!({"a": 1})));
        assert_eq!(decoded.other["buffers"], json!([{"byteLength": 5}]));

        let bin = decoded.binary.unwrap();
        assert!(bin.starts_with(&[1, 2, 3, 4, 5]));
        assert!(bin[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let scene = sample_scene();
        assert_eq!(to_vec(&scene).unwrap(), to_vec(&scene).unwrap());
    }

    #[test]
    fn test_rewrite_is_stable() {
        let first = to_vec(&sample_scene()).unwrap();
        let second = to_vec(&from_slice(&first).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scene_without_binary_has_single_chunk() {
        let mut scene = sample_scene();
        scene.binary = None;

        let bytes = to_vec(&scene).unwrap();
        let json_len = read_u32(&bytes, 12) as usize;
        assert_eq!(bytes.len(), HEADER_LEN + CHUNK_HEADER_LEN + json_len);
        assert_eq!(from_slice(&bytes).unwrap().binary, None);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = to_vec(&sample_scene()).unwrap();
        bytes[0] = b'x';

        assert!(matches!(from_slice(&bytes), Err(SceneError::Glb(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = to_vec(&sample_scene()).unwrap();

        assert!(matches!(from_slice(&bytes[..8]), Err(SceneError::Glb(_))));
        assert!(from_slice(&bytes[..bytes.len() - 4]).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(from_slice(b"not a glb file").is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load(Utf8Path::new("/definitely/not/here.glb")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.glb"));
    }
}
