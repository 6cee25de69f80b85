use crate::error::ConversionError;
use crate::events::{self, Event, EventReceiver, EventSender};
use crate::metrics::Metrics;
use crate::models::{
    BatchState, ConversionJob, ConversionOptions, ConverterSettings, CustomMetadata, RunState,
};
use crate::services::converter::SceneConverter;
use crate::services::dependencies::check_converter;
use crate::services::runner::JobRunner;
use crate::state::StateManager;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;

/// Result of a [`BatchOrchestrator::start_batch`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStart {
    /// The runner was spawned for this many files
    Launched { files: usize },

    /// The batch ended during validation; its events (ending in `Done`) are already queued
    Finished,

    /// A batch is still running; nothing was done
    Busy,
}

/// Validates a batch request and drives the [`JobRunner`] on a blocking worker
///
/// Owns the run state and the event channel. The consumer drains events through
/// [`try_next_event()`](Self::try_next_event); the state only returns to
/// [`RunState::Idle`] once the consumer has taken the run's `Done`.
pub struct BatchOrchestrator {
    runtime: Handle,
    converter: Arc<dyn SceneConverter>,
    converter_program: String,
    source_extension: String,
    target_extension: String,
    state: StateManager,
    sender: EventSender,
    receiver: Mutex<EventReceiver>,
    metrics: Arc<Metrics>,
}

impl BatchOrchestrator {
    pub fn new(
        runtime: Handle,
        converter: Arc<dyn SceneConverter>,
        settings: &ConverterSettings,
    ) -> Self {
        let (sender, receiver) = events::channel();

        Self {
            runtime,
            converter,
            converter_program: settings.converter.executable.clone(),
            source_extension: settings.source_extension.clone(),
            target_extension: settings.target_extension.clone(),
            state: StateManager::new(),
            sender,
            receiver: Mutex::new(receiver),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Start converting every source file directly inside `input` into `output`.
    ///
    /// Returns immediately. Non-blank `metadata_text` must be a JSON object; its entries are
    /// added to `options.custom_metadata`, overwriting matching keys.
    pub fn start_batch(
        &self,
        input: &Utf8Path,
        output: &Utf8Path,
        mut options: ConversionOptions,
        metadata_text: &str,
    ) -> BatchStart {
        if !self.state.try_begin() {
            tracing::warn!("Batch requested while another batch is running, ignoring");
            return BatchStart::Busy;
        }

        tracing::info!("Batch requested: {} -> {}", input, output);

        if !input.is_dir() || !output.is_dir() {
            let err = if input.is_dir() {
                ConversionError::InvalidPath(output.to_path_buf())
            } else {
                ConversionError::InvalidPath(input.to_path_buf())
            };
            tracing::error!("{}", err);
            return self.finish_early(|events| events.error("Error", err.to_string()));
        }

        match parse_metadata(metadata_text) {
            Ok(metadata) => options.custom_metadata.extend(metadata),
            Err(err) => {
                tracing::error!("{}", err);
                return self.finish_early(|events| events.error("Invalid JSON", err.to_string()));
            }
        }

        let files = match collect_source_files(input, &self.source_extension) {
            Ok(files) => files,
            Err(err) => {
                tracing::error!("{}", err);
                return self.finish_early(|events| events.error("Error", err.to_string()));
            }
        };

        if files.is_empty() {
            tracing::info!("No {} files in {}", self.source_extension, input);
            return self.finish_early(|events| {
                events.info(
                    "Info",
                    format!("No {} files found in input folder", self.source_extension),
                )
            });
        }

        let options = Arc::new(options);
        let jobs: Vec<ConversionJob> = files
            .into_iter()
            .map(|source| {
                ConversionJob::new(source, output, &self.target_extension, Arc::clone(&options))
            })
            .collect();
        let count = jobs.len();

        let runner = JobRunner::new(
            Arc::clone(&self.converter),
            self.sender.clone(),
            Arc::clone(&self.metrics),
        );
        self.runtime.spawn_blocking(move || runner.run(&jobs));

        tracing::info!("Spawned conversion worker for {} files", count);
        BatchStart::Launched { files: count }
    }

    fn finish_early(&self, report: impl FnOnce(&EventSender)) -> BatchStart {
        report(&self.sender);
        self.sender.done();
        BatchStart::Finished
    }

    /// Take the next queued event without waiting and fold it into the batch state.
    pub fn try_next_event(&self) -> Option<Event> {
        let event = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_next()?;
        self.state.apply(&event);
        Some(event)
    }

    /// Look for the converter on `path_var` in the background.
    ///
    /// Reports through the event channel without touching the run state.
    pub fn check_dependencies(&self, path_var: Option<OsString>) {
        let program = self.converter_program.clone();
        let events = self.sender.clone();

        self.runtime.spawn_blocking(move || {
            match check_converter(&program, path_var.as_deref()) {
                Ok(_) => events.info("Dependencies", "All dependencies are installed and ready!"),
                Err(err) => events.warning("Dependencies", err.to_string()),
            }
        });
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state()
    }

    pub fn snapshot(&self) -> BatchState {
        self.state.snapshot()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Parse the caller's metadata text. Blank text means no metadata.
pub fn parse_metadata(text: &str) -> Result<CustomMetadata, ConversionError> {
    if text.trim().is_empty() {
        return Ok(CustomMetadata::new());
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ConversionError::MalformedMetadata(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ConversionError::MalformedMetadata(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// List the files directly inside `dir` whose extension matches, sorted by name.
///
/// The match is exact: `a.FBX` is not an `fbx` source, so `a.fbx` and `a.FBX` can never
/// both claim `a.glb`.
pub fn collect_source_files(
    dir: &Utf8Path,
    extension: &str,
) -> Result<Vec<Utf8PathBuf>, ConversionError> {
    let entries = dir
        .read_dir_utf8()
        .map_err(|_| ConversionError::InvalidPath(dir.to_path_buf()))?;

    let mut files: Vec<Utf8PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir, e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension() == Some(extension)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
