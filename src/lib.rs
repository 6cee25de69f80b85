// fbx2glb - Batch FBX to GLB conversion
//
// This is the library crate containing the conversion pipeline and its data structures.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scene;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::ConversionError;
pub use events::{Event, EventReceiver, EventSender};
pub use models::{BatchState, ConversionOptions, ConverterSettings, RunState};
pub use services::{BatchOrchestrator, BatchStart, Fbx2GltfConverter, SceneConverter};
pub use state::StateManager;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
