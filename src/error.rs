use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid age {value:?} on row {row}")]
    InvalidAge { row: usize, value: String },

    #[error("No display color for {0:?}")]
    UnknownColor(String),

    #[error("Unknown age range: {0:?}")]
    UnknownAgeRange(String),

    #[error("Unknown gender: {0:?}")]
    UnknownGender(String),

    #[error("Refusing to overwrite the input file {}", .0.display())]
    SameInputOutput(PathBuf),
}

impl DashboardError {
    /// Errors caused by a bad selector rather than by the data or the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DashboardError::UnknownAgeRange(_) | DashboardError::UnknownGender(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
