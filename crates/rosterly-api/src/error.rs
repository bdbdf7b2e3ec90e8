use thiserror::Error;

/// Top-level error type for the `rosterly-api` crate.
///
/// Distinguishes the three remote rejections callers must react to
/// (missing id, email collision, payload rejection) from transport-level
/// failures, which are all surfaced identically as retryable.
#[derive(Debug, Error)]
pub enum Error {
    // ── Remote rejections ───────────────────────────────────────────
    /// The remote collection has no record with the requested id.
    #[error("Record not found")]
    NotFound,

    /// A mutation was rejected because another record already holds the
    /// submitted email address.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The remote rejected the payload for a reason other than an email
    /// collision (the client validates before submitting, so this is rare).
    #[error("Request rejected by server (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, DNS failure).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 5xx-class remote failure. Indistinguishable from a transport
    /// failure as far as callers are concerned.
    #[error("Server failure (HTTP {status})")]
    RemoteFailure { status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the remote reported a missing identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` if the remote rejected a mutation for violating
    /// email uniqueness.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` for failures worth a manual retry: transport
    /// errors, malformed responses, and 5xx-class remote failures.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RemoteFailure { .. } | Self::Deserialization { .. }
        )
    }
}
