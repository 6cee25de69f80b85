use crate::scene::SceneError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running a conversion batch
///
/// `InvalidPath` and `MalformedMetadata` are preconditions: they abort a batch before any
/// job starts. `ExternalToolFailed` and `SceneIoFailed` belong to a single job and never
/// stop the rest of the batch. `DependencyMissing` is advisory only.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Folder does not exist: {0}")]
    InvalidPath(Utf8PathBuf),

    #[error("Custom data is not valid JSON:\n{0}")]
    MalformedMetadata(String),

    #[error("{program} exited with {}: {diagnostics}", exit_label(.code))]
    ExternalToolFailed {
        program: String,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error(transparent)]
    SceneIoFailed(#[from] SceneError),

    #[error("Missing: {}", .0.join(", "))]
    DependencyMissing(Vec<String>),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}
