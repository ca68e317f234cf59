use thiserror::Error;

/// Top-level error type for the `rollcall-api` crate.
///
/// Covers every failure mode the sign-up service can produce:
/// transport, application-level rejections, and malformed payloads.
/// The TUI maps these into user-facing status text.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Application ─────────────────────────────────────────────────
    /// Non-2xx response from the sign-up service, with the `detail`
    /// field from its JSON error body when one was present.
    #[error("Sign-up service error (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The server-supplied `detail` text, if this is an application
    /// failure that carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if no response was received at all (network or
    /// protocol failure, as opposed to a rejection from the service).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a "not found" rejection.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 404,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
