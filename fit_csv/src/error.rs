use std::path::PathBuf;

use crate::MessageError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to access `{}`. Reason: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode FIT file `{}`. Reason: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        source: fitparser::Error,
    },

    #[error("Timestamp out of range in `{}`. Reason: {}", .path.display(), .source)]
    InvalidTimestamp {
        path: PathBuf,
        source: time::error::ComponentRange,
    },

    #[error("Malformed message in `{}`. Reason: {}", .path.display(), .source)]
    Malformed {
        path: PathBuf,
        source: MessageError,
    },

    #[error("Failed to write CSV `{}`. Reason: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },
}
