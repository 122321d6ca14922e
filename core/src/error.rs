//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors (unreadable schema root, manifest file).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A single schema document could not be parsed.
    #[from(ignore)]
    #[display("Parse Error in {}: {message}", path.display())]
    Parse {
        /// The offending document.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The control manifest is missing or malformed.
    #[from(ignore)]
    #[display("Manifest Error: {_0}")]
    Manifest(String),

    /// A reference chain loops back onto itself while resolving one type.
    #[from(ignore)]
    #[display("Reference Cycle: {}", _0.join(" -> "))]
    ReferenceCycle(Vec<String>),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
