//! Data models for the fbx2glb converter.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`ConversionJob`] / [`ConversionOptions`]: one source file bound to its destination, and the
//!   post-processing policy shared read-only by every job of a batch
//! - [`JobState`]: per-job lifecycle inside the runner
//! - [`BatchState`] / [`RunState`]: the consumer-side view of a batch, folded from drained events
//! - [`ConverterSettings`]: settings persisted in `fbx2glb Config.yaml`
//!
//! # Architecture Note
//!
//! - **Serializable**: settings derive `Serialize`/`Deserialize` for YAML persistence
//! - **Shared, not copied**: options travel to jobs behind an `Arc`
//! - **Single writer**: `BatchState` is only mutated through
//!   [`StateManager`](crate::state::StateManager), which the orchestrator owns

pub mod batch_state;
pub mod config;
pub mod job;

pub use batch_state::{BatchState, Notice, RunState, Severity};
pub use config::{ConverterSettings, ConverterToolSettings, DefaultOptions, LoggingSettings};
pub use job::{ConversionJob, ConversionOptions, CustomMetadata, JobState};
