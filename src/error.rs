//! Fetch error taxonomy
//!
//! Every source client classifies failures into this enum. `NotFound`
//! always means "try the next candidate or source". `Transport` and
//! `Malformed` also do during candidate iteration, but are remembered so a
//! terminal source failure can be told apart from a genuine absence.

use thiserror::Error;

/// Classification of a single failed source fetch.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The identifier is absent from this source.
    #[error("not found")]
    NotFound,

    /// Network or HTTP-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response parsed as the wrong shape. Treated like a transport
    /// failure for resolution purposes.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// True for a clean "this source does not have it" answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}
