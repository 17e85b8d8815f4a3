// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for curlwrap
//!
//! Transfer problems surface only from [`Request::execute`](crate::Request::execute),
//! and a failed transfer still hands back whatever the transport managed to report.

use thiserror::Error;

use crate::http::Response;

/// Result type alias for curlwrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for curlwrap
#[derive(Error, Debug)]
pub enum Error {
    /// The transport capability is missing from this environment
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The transport reported a failed transfer
    #[error("Transfer failed: {message}")]
    TransportFailure {
        message: String,
        /// Partial snapshot of what the transport returned
        response: Box<Response>,
    },

    /// Response body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Transport configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a transport failure carrying a partial response
    pub fn transport_failure(message: impl Into<String>, response: Response) -> Self {
        Error::TransportFailure {
            message: message.into(),
            response: Box::new(response),
        }
    }

    /// Create a transport-unavailable error
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Error::TransportUnavailable(msg.into())
    }

    /// Check if this is a failed transfer
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::TransportFailure { .. })
    }

    /// Check if this is a JSON decoding error
    pub fn is_invalid_json(&self) -> bool {
        matches!(self, Error::InvalidJson(_))
    }

    /// Partial response attached to a failed transfer
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::TransportFailure { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Take ownership of the partial response
    pub fn into_response(self) -> Option<Response> {
        match self {
            Error::TransportFailure { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// Transport error code of a failed transfer, if any
    pub fn error_number(&self) -> Option<i32> {
        self.response()
            .map(Response::get_error_number)
            .filter(|code| *code != 0)
    }
}
