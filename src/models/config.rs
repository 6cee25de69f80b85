use crate::models::job::{ConversionOptions, CustomMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings loaded from `fbx2glb Config.yaml`
///
/// Every field has a default, so a partial (or missing) file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub converter: ConverterToolSettings,

    /// Extension of the files picked up from the input folder (without the dot)
    pub source_extension: String,

    /// Extension of the files written to the output folder (without the dot)
    pub target_extension: String,

    pub defaults: DefaultOptions,

    pub logging: LoggingSettings,

    /// How often the frontend drains the event channel
    pub poll_interval_ms: u64,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            converter: ConverterToolSettings::default(),
            source_extension: "fbx".to_string(),
            target_extension: "glb".to_string(),
            defaults: DefaultOptions::default(),
            logging: LoggingSettings::default(),
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterToolSettings {
    /// Program name (looked up on PATH) or full path of the FBX2glTF binary
    pub executable: String,
}

impl Default for ConverterToolSettings {
    fn default() -> Self {
        Self {
            executable: "fbx2gltf".to_string(),
        }
    }
}

/// Option values a batch starts with unless the frontend overrides them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultOptions {
    pub keep_materials: bool,
    pub remove_textures: bool,
    pub custom_metadata: CustomMetadata,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        let mut custom_metadata = CustomMetadata::new();
        custom_metadata.insert(
            "origin".to_string(),
            Value::String("origin_pack_name".to_string()),
        );

        Self {
            keep_materials: true,
            remove_textures: true,
            custom_metadata,
        }
    }
}

impl DefaultOptions {
    /// Default metadata rendered the way the metadata editor shows it
    pub fn metadata_text(&self) -> String {
        if self.custom_metadata.is_empty() {
            return String::new();
        }
        serde_json::to_string_pretty(&self.custom_metadata).unwrap_or_default()
    }

    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions {
            keep_materials: self.keep_materials,
            remove_textures: self.remove_textures,
            custom_metadata: self.custom_metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub directory: String,
    pub prefix: String,
    pub debug: bool,
    pub console: bool,

    /// Write the log file as JSON lines instead of plain text
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            prefix: "fbx2glb".to_string(),
            debug: false,
            console: true,
            json: false,
        }
    }
}
