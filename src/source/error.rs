use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmalgamateError {
    #[error("File not found under {}: {path}", root.display())]
    FileNotFound { path: String, root: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid include path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AmalgamateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
