use std::io;

use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open pairs file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read pairs input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected two fields separated by a tab")]
    MissingSeparator { line: usize },
    #[error("no pairs found in input")]
    NoPairs,
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    #[error("writer thread stopped before all batches were sent")]
    WriterClosed,
    #[error("writer thread panicked: {0}")]
    WriterPanicked(String),
}
