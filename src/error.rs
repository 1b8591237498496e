use std::path::PathBuf;
use thiserror::Error;

/// ライブラリ境界で返すエラー
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("input source could not be opened: {0}")]
    SourceUnavailable(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("progress store {path} is malformed: {source}")]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode progress store: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
