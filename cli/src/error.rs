#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the `dtogen` binary.

use derive_more::{Display, From};
use dtogen_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Compilation failure from the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// The compiled model could not be serialised.
    #[display("Serialization Error: {}", _0)]
    #[from(ignore)]
    Serialize(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// `AppError` carries a `String` variant, so `source()` is left at its default.
impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Serialize(e.to_string())
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
