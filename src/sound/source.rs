//! Sound sources for the alarm chime.

use std::path::{Path, PathBuf};

/// A sound to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// The built-in synthesized chime
    Chime,
    /// A sound file on disk
    File {
        /// Path of the sound file
        path: PathBuf,
    },
}

impl SoundSource {
    /// Returns a file-backed source.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns a short description for logging.
    pub fn describe(&self) -> String {
        match self {
            Self::Chime => "built-in chime".to_string(),
            Self::File { path } => path.display().to_string(),
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Chime
    }
}
