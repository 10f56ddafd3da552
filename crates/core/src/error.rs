// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for reflector-core operations.

use thiserror::Error;

/// All possible errors that can occur in reflector-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("unsupported scheme: '{0}'\n  hint: supported schemes are: http, https, ws, wss")]
    UnsupportedScheme(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reflector-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
