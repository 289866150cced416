use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimepieceError>;

#[derive(Debug, Error)]
pub enum TimepieceError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("settings file {path} is malformed: {source}")]
    MalformedSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode settings: {0}")]
    EncodeSettings(#[source] serde_json::Error),

    #[error("no settings directory available")]
    NoConfigDir,

    #[error("invalid configuration: {0}")]
    Config(String),
}
