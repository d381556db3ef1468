use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a run.
///
/// Per-entry problems (unreadable directories, failed stats, files that
/// cannot be opened) never surface here; they are reported and recorded
/// in the [`RunSummary`](crate::RunSummary) instead.
#[derive(Debug, Error)]
pub enum ReccatError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot create output file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
    #[error("Invalid ignore pattern: {0}")]
    Pattern(String),
    #[error("invalid exclusion rules in {path}: {source}")]
    Rules {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ReccatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReccatError::Io {
            path: path.into(),
            source,
        }
    }
}
