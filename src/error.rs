//! # Error Handling
//!
//! This module defines the centralized error type for the `repo-watch`
//! library. It uses `thiserror` to derive a single `Error` enum covering the
//! failure modes that can abort a whole invocation, such as a missing or
//! malformed configuration file.
//!
//! Failures of an individual repository's action are *not* propagated
//! through this type across the batch boundary. They are converted into an
//! [`Outcome`](crate::dispatch::Outcome) by the action that produced them, so
//! one repository never aborts its siblings.

use thiserror::Error;

/// Main error type for repo-watch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A repository with this nickname is already registered.
    #[error("Repository nickname already exists in config: {nickname}")]
    DuplicateNickname { nickname: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
