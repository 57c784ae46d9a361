// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the aggregation and feed components.

use std::time::Duration;

use crate::config::ConfigError;

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing date input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// In-memory input violated an aggregator's contract (zero weight,
    /// empty window, negative or NaN metric value, ...).
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the caller can reasonably retry the operation that produced
    /// this error. Only page fetches qualify; everything else is a bug
    /// upstream.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Fetch(_))
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::PreconditionViolation(msg.into())
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Failure of a single page fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Page fetch failed: {0}")]
    Source(#[from] anyhow::Error),

    #[error("Page fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
