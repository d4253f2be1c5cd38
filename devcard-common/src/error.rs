//! Common error types for devcard

use crate::scores::Slot;
use thiserror::Error;

/// Common result type for devcard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the record store, extractor, report filler and access gate
///
/// Library code only returns these; turning one into a user-visible notice is
/// the job of the presentation layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or query error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spreadsheet base name matches none of the known age-group layouts
    #[error("Unsupported spreadsheet: {0}")]
    InvalidFileKind(String),

    /// Score cell is blank
    #[error("Value for {slot} is empty. Please fill in the cell in the spreadsheet.")]
    MissingScore { slot: Slot },

    /// Score cell is not a number, or not one of 1..=4
    #[error("Invalid value for {slot}: {value}. Expected a number from 1 to 4.")]
    InvalidScore { slot: Slot, value: String },

    /// Workbook could not be opened or a required sheet is missing
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Report template has no table with the expected header cells
    #[error("Table not found in the document")]
    TableNotFound,

    /// Report template could not be read, or the output could not be written
    #[error("Report error: {0}")]
    Report(String),

    /// Date text does not match DD-MM-YYYY
    #[error("Invalid date format '{0}'. Use DD-MM-YYYY")]
    BadDateFormat(String),

    /// A required form field was left empty
    #[error("All fields must be filled in (missing: {0})")]
    EmptyRequiredField(String),

    /// License key rejected, or the activation period is missing or expired
    #[error("Activation failed: {0}")]
    InvalidActivation(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),
}
