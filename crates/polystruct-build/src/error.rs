//! Error types for the build front end

use std::path::PathBuf;

use thiserror::Error;

use polystruct_core::ConfigError;

/// Errors that stop the build script. Generation problems are diagnostics,
/// not errors.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No output directory: set OUT_DIR or call Builder::out_dir")]
    MissingOutDir,

    #[error("Cannot infer a module path for {0}; use Builder::file_in_module")]
    UnknownModule(PathBuf),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
