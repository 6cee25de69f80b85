use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied metadata merged into every converted scene's `extras`
pub type CustomMetadata = IndexMap<String, Value>;

/// Post-processing policy shared read-only by every job of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub keep_materials: bool,
    pub remove_textures: bool,
    pub custom_metadata: CustomMetadata,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            keep_materials: true,
            remove_textures: true,
            custom_metadata: CustomMetadata::new(),
        }
    }
}

/// One source file to convert, bound to its destination and the batch options
#[derive(Debug, Clone)]
pub struct ConversionJob {
    source: Utf8PathBuf,
    destination: Utf8PathBuf,
    options: Arc<ConversionOptions>,
}

impl ConversionJob {
    /// Build a job writing `<output_dir>/<source stem>.<target_extension>`.
    pub fn new(
        source: Utf8PathBuf,
        output_dir: &Utf8Path,
        target_extension: &str,
        options: Arc<ConversionOptions>,
    ) -> Self {
        let stem = source.file_stem().unwrap_or(source.as_str());
        let destination = output_dir.join(format!("{}.{}", stem, target_extension));

        Self {
            source,
            destination,
            options,
        }
    }

    pub fn source(&self) -> &Utf8Path {
        &self.source
    }

    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Where the external converter writes its output.
    ///
    /// The converter writes straight to the destination, which the transform then
    /// rewrites in place.
    pub fn intermediate(&self) -> &Utf8Path {
        &self.destination
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// File name used in status and error messages
    pub fn display_name(&self) -> &str {
        self.source.file_name().unwrap_or(self.source.as_str())
    }
}

/// Lifecycle of a single job inside the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Converting,
    Transforming,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Pending => "pending",
            JobState::Converting => "converting",
            JobState::Transforming => "transforming",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        f.write_str(label)
    }
}
