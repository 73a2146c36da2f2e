//! Rendering of the `Instance` CustomResourceDefinition.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use kube::CustomResourceExt;
use thiserror::Error;

use super::instance::Instance;

/// Errors raised while rendering or writing the CRD manifest.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ManifestError {
    /// Raised when the CRD cannot be serialised to YAML.
    #[error("failed to render CRD: {0}")]
    Render(String),
    /// Raised when the output path has no file name.
    #[error("output path {path} is missing a filename")]
    InvalidPath {
        /// Offending path.
        path: String,
    },
    /// Raised when the manifest cannot be written.
    #[error("failed to write {path}: {message}")]
    Io {
        /// Path being written.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Renders the `Instance` CRD as a YAML document.
///
/// # Errors
///
/// Returns [`ManifestError::Render`] when serialisation fails.
pub fn render_crd() -> Result<String, ManifestError> {
    serde_yaml::to_string(&Instance::crd()).map_err(|err| ManifestError::Render(err.to_string()))
}

/// Writes the rendered CRD to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ManifestError`] when rendering fails, the path has no file name,
/// or the file cannot be written.
pub fn write_crd(path: &Utf8Path) -> Result<(), ManifestError> {
    let rendered = render_crd()?;
    let file_name = path.file_name().ok_or_else(|| ManifestError::InvalidPath {
        path: path.to_string(),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    Dir::create_ambient_dir_all(parent, ambient_authority())
        .map_err(|err| io_error(parent, &err))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| io_error(parent, &err))?;
    dir.write(file_name, rendered)
        .map_err(|err| io_error(path, &err))
}

fn io_error(path: &Utf8Path, err: &io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.to_string(),
        message: err.to_string(),
    }
}
