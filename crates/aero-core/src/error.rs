//! Core error type.
//!
//! Sub-crates define their own error enums (`GridError`, `SimError`) and
//! either convert `CoreError` via `From` or wrap it as one variant.

use thiserror::Error;

/// Errors produced by `aero-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid sampling range [{lo}, {hi}]")]
    InvalidRange { lo: f64, hi: f64 },
}

/// Shorthand result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
