//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Defaults when the settings file is missing or partial
//! - Settings feeding the batch defaults

use camino::Utf8PathBuf;
use fbx2glb::ConfigManager;
use fbx2glb::models::ConverterSettings;
use fbx2glb::services::parse_metadata;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
}

#[test]
fn test_load_without_file_uses_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = manager.load_settings().unwrap();

    assert_eq!(settings.converter.executable, "fbx2gltf");
    assert_eq!(settings.source_extension, "fbx");
    assert!(settings.defaults.keep_materials);
    assert!(settings.defaults.remove_textures);
    // Loading never writes the file
    assert!(!manager.settings_path().exists());
}

#[test]
fn test_save_then_load_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut settings = ConverterSettings::default();
    settings.poll_interval_ms = 250;
    settings.logging.debug = true;
    settings
        .defaults
        .custom_metadata
        .insert("tags".to_string(), serde_json::json!(["prop", "wood"]));
    manager.save_settings(&settings).unwrap();

    let reloaded = ConfigManager::new(&config_path).unwrap().load_settings().unwrap();
    assert_eq!(reloaded, settings);

    let keys: Vec<_> = reloaded.defaults.custom_metadata.keys().cloned().collect();
    assert_eq!(keys, ["origin", "tags"]);
}

#[test]
fn test_hand_written_partial_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("fbx2glb Config.yaml"),
        "converter:\n  executable: C:/Tools/FBX2glTF.exe\npoll_interval_ms: 50\n",
    )
    .unwrap();

    let settings = ConfigManager::new(&config_path).unwrap().load_settings().unwrap();

    assert_eq!(settings.converter.executable, "C:/Tools/FBX2glTF.exe");
    assert_eq!(settings.poll_interval_ms, 50);
    assert_eq!(settings.target_extension, "glb");
}

#[test]
fn test_default_metadata_text_is_accepted_by_batch() {
    let settings = ConverterSettings::default();

    let parsed = parse_metadata(&settings.defaults.metadata_text()).unwrap();

    assert_eq!(parsed, settings.defaults.custom_metadata);
}
