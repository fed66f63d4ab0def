//! Centralized error handling for the contest-hub application
//!
//! This module provides the error types shared across application layers and
//! consistent conversions between them.
//!
//! # Error Categories
//!
//! - **Source Errors**: upstream contest/playlist connectivity and parsing
//! - **Validation Errors**: input validation and business rule violations
//! - **Configuration Errors**: malformed or missing configuration values
//!
//! # Usage
//!
//! ```rust
//! use contest_hub::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     // Function can return any error type that converts to AppError
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
