use crate::error::ConversionError;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Turns one source asset into one GLB file
///
/// The seam between the job runner and the external converter. Implementations must be
/// shareable across the worker thread.
#[cfg_attr(test, mockall::automock)]
pub trait SceneConverter: Send + Sync {
    /// Convert `source` into a binary scene written at `output`.
    fn convert(&self, source: &Utf8Path, output: &Utf8Path) -> Result<(), ConversionError>;
}

/// Runs the FBX2glTF command line tool
///
/// Invocation: `<executable> -i <source> -o <output> --binary`. Only the exit status decides
/// success; captured output is kept for diagnostics. There is no retry and no timeout.
#[derive(Debug, Clone)]
pub struct Fbx2GltfConverter {
    executable: Utf8PathBuf,
}

impl Fbx2GltfConverter {
    pub fn new(executable: impl Into<Utf8PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// Build the command for one file.
    pub fn build_command(&self, source: &Utf8Path, output: &Utf8Path) -> Command {
        let mut cmd = Command::new(self.executable.as_std_path());
        cmd.arg("-i")
            .arg(source.as_std_path())
            .arg("-o")
            .arg(output.as_std_path())
            .arg("--binary")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn program_name(&self) -> String {
        self.executable
            .file_name()
            .unwrap_or(self.executable.as_str())
            .to_string()
    }
}

impl Default for Fbx2GltfConverter {
    fn default() -> Self {
        Self::new("fbx2gltf")
    }
}

impl SceneConverter for Fbx2GltfConverter {
    fn convert(&self, source: &Utf8Path, output: &Utf8Path) -> Result<(), ConversionError> {
        tracing::info!("Executing: {} -i {} -o {} --binary", self.executable, source, output);

        let start = Instant::now();
        let output_result = self.build_command(source, output).output();

        let process_output = match output_result {
            Ok(process_output) => process_output,
            Err(e) => {
                tracing::error!("Failed to launch {}: {}", self.executable, e);
                return Err(ConversionError::ExternalToolFailed {
                    program: self.program_name(),
                    code: None,
                    diagnostics: format!("failed to launch {}: {}", self.executable, e),
                });
            }
        };

        let code = process_output.status.code();
        tracing::info!(
            "{} completed in {:.2}s with exit code {:?}",
            self.program_name(),
            start.elapsed().as_secs_f32(),
            code
        );

        if process_output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&process_output.stderr);
        let stdout = String::from_utf8_lossy(&process_output.stdout);
        let diagnostics = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        Err(ConversionError::ExternalToolFailed {
            program: self.program_name(),
            code,
            diagnostics,
        })
    }
}
