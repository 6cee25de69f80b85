use crate::error::ConversionError;
use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsStr;

const INSTALL_HINT: &str = "install from https://github.com/facebookincubator/FBX2glTF/releases";

/// Resolve `program` to an existing file.
///
/// A program containing a path separator is checked as-is. A bare name is searched in each
/// entry of `path_var` (normally the value of `PATH`); on Windows `<name>.exe` is tried too.
pub fn find_on_path(program: &str, path_var: Option<&OsStr>) -> Option<Utf8PathBuf> {
    let candidate = Utf8Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = path_var?;
    std::env::split_paths(path_var)
        .filter_map(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .flat_map(|dir| candidate_names(program).map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

#[cfg(windows)]
fn candidate_names(program: &str) -> impl Iterator<Item = String> {
    let exe = if program.to_ascii_lowercase().ends_with(".exe") {
        None
    } else {
        Some(format!("{}.exe", program))
    };
    std::iter::once(program.to_string()).chain(exe)
}

#[cfg(not(windows))]
fn candidate_names(program: &str) -> impl Iterator<Item = String> {
    std::iter::once(program.to_string())
}

/// Check that the converter executable is available.
pub fn check_converter(
    program: &str,
    path_var: Option<&OsStr>,
) -> Result<Utf8PathBuf, ConversionError> {
    match find_on_path(program, path_var) {
        Some(resolved) => {
            tracing::info!("Found {} at {}", program, resolved);
            Ok(resolved)
        }
        None => {
            tracing::warn!("{} not found", program);
            Err(ConversionError::DependencyMissing(vec![format!(
                "{} ({})",
                program, INSTALL_HINT
            )]))
        }
    }
}
