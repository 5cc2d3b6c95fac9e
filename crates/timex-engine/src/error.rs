//! Error types for timex-engine operations.
//!
//! Only contract violations are errors. A span that no strategy recognizes is
//! an unsuccessful [`DateTimeResolutionResult`](crate::model::DateTimeResolutionResult),
//! never an `Err`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimexError {
    #[error("Missing lookup key '{key}' in {table} table")]
    MissingLookup { table: &'static str, key: String },

    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid reference instant: {0}")]
    InvalidReference(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, TimexError>;
