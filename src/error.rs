//! Error type shared by the session, the sidecar layer and the GUI shell.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong while annotating.
///
/// The GUI treats every variant as fatal: the window closes and the error
/// becomes the process exit status.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed box on line {line} of {path:?}: {content:?}")]
    Parse {
        path: PathBuf,
        /// 1-based line number
        line: usize,
        content: String,
    },

    #[error("Cannot decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Sidecar file {0:?} does not exist")]
    MissingSidecar(PathBuf),

    #[error("Current image {0:?} is no longer in its directory")]
    CurrentImageMissing(PathBuf),

    #[error("GUI error: {0}")]
    Gui(#[from] eframe::Error),
}

impl AnnotatorError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;
