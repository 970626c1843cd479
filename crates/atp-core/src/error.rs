use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read match data from {path}: {source}")]
    Corpus {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed match row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
