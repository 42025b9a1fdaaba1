#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Invalid or incomplete document configuration (info, schemes, host).
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// A declared parameter uses a type outside the supported primitive set.
    #[from(ignore)]
    #[display("Unsupported Type: {_0}")]
    UnsupportedType(String),

    /// A `$ref` that does not point at a registered definition.
    #[from(ignore)]
    #[display("Unresolved Reference: {_0}")]
    UnresolvedReference(String),

    /// JSON / YAML rendering or parsing failures.
    #[from(ignore)]
    #[display("Serialization Error: {_0}")]
    Serialization(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
