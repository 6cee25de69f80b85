//! Services module - the conversion pipeline.
//!
//! Everything here is framework-agnostic: no terminal output, no global state. Progress
//! leaves the pipeline only through the [`events`](crate::events) channel.
//!
//! # Components
//!
//! - [`SceneConverter`] / [`Fbx2GltfConverter`]: runs the external converter for one file,
//!   `<executable> -i <source> -o <output> --binary`
//! - [`transform`]: in-place scene post-processing (strip textures, strip materials, merge
//!   custom metadata into `extras`)
//! - [`JobRunner`]: converts then transforms each job in order, isolating per-file failures
//! - [`BatchOrchestrator`]: validates a request, spawns the runner on a blocking worker and
//!   owns the run state
//! - [`check_converter`]: PATH lookup for the converter executable
//!
//! # Usage Example
//!
//! ```ignore
//! use fbx2glb::services::{BatchOrchestrator, Fbx2GltfConverter};
//!
//! let orchestrator = BatchOrchestrator::new(
//!     runtime.handle().clone(),
//!     Arc::new(Fbx2GltfConverter::new("fbx2gltf")),
//!     &settings,
//! );
//!
//! orchestrator.start_batch(input, output, options, r#"{"origin": "my_pack"}"#);
//! while let Some(event) = orchestrator.try_next_event() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod batch;
pub mod converter;
pub mod dependencies;
pub mod runner;
pub mod transform;

pub use batch::{BatchOrchestrator, BatchStart, collect_source_files, parse_metadata};
pub use converter::{Fbx2GltfConverter, SceneConverter};
pub use dependencies::{check_converter, find_on_path};
pub use runner::{JobRunner, RunReport};
pub use transform::transform;
