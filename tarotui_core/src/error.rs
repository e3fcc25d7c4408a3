//! Error types for the card popup

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopupError {
    /// Reference dataset or config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File was read but is not the JSON we expect
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The background load thread went away without reporting
    #[error("reference loader disconnected before finishing")]
    LoaderDisconnected,
}

pub type Result<T> = std::result::Result<T, PopupError>;
