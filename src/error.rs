use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a CSV source into a [`SalesTable`](crate::data::model::SalesTable).
///
/// Loading is all-or-nothing: whenever one of these is returned no table
/// was produced.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("row {row}, column '{column}': '{value}' {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },
}

impl DataLoadError {
    /// The column the error is about, when it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            DataLoadError::MissingColumn { column }
            | DataLoadError::InvalidValue { column, .. } => Some(column),
            DataLoadError::Io { .. } | DataLoadError::Csv { .. } => None,
        }
    }
}
