use std::path::PathBuf;
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while reading and normalizing RTS-GMLC data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Unknown bus {bus_id} referenced by {context}")]
    UnknownBus { context: String, bus_id: u32 },

    #[error("Invalid value in {path} (row {row}): {message}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("Table {path} contains no rows")]
    EmptyTable { path: PathBuf },

    #[error("Time series '{name}' has no timestamps")]
    NoTimestamps { name: String },
}

impl DataError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.into(),
            source,
        }
    }
}
