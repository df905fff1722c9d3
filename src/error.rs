use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: keyword {keyword:?} must be in a section")]
    DirectiveOutsideSection { keyword: String, line: usize },

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigDiffError>,
    },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigDiffError {
    /// Attach the path of the file being processed.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ConfigDiffError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigDiffError>;
