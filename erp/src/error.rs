// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// ERP client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ErpError {
    /// The request never reached the server (DNS, refused connection, TLS).
    #[error("No access to the API: {0}")]
    NetworkUnreachable(String),

    /// The request was aborted after its deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server message, or the raw body when none was provided.
        message: String,
    },

    /// The body is not JSON, or JSON of the wrong shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Well-formed response reporting `Success=false`.
    #[error("{0}")]
    ApplicationFailure(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErpError {
    /// Whether the request was aborted by its deadline.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the server could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::NetworkUnreachable(_))
    }
}

impl From<reqwest::Error> for ErpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            Self::NetworkUnreachable(e.to_string())
        } else if e.is_decode() || e.is_body() {
            Self::MalformedResponse(e.to_string())
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::NetworkUnreachable(e.to_string())
        }
    }
}
