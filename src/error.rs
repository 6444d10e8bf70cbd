use std::io;

use thiserror::Error;

/// Configuration-time validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configured numeric limit must be strictly greater than zero.
    #[error("limit `{limit}` must be greater than 0")]
    InvalidLimitValue {
        /// Name of the limit.
        limit: &'static str,
    },
}

/// Parse-level failures in header values, boundaries and part text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Generic parse failure with message context.
    #[error("{message}")]
    Message {
        /// Parse failure message.
        message: String,
    },
}

impl ParseError {
    /// Creates a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Misuse of the one-shot accessors of a multipart message.
///
/// These are caller bugs rather than properties of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// The preamble was already requested, or part traversal has started.
    #[error("preamble is no longer available")]
    PreambleUnavailable,
    /// The parts sequence was already requested.
    #[error("parts sequence was already requested")]
    PartsUnavailable,
    /// An earlier advance failed midway; the message cannot continue.
    #[error("multipart message is unusable after an earlier failure")]
    Poisoned,
}

/// Runtime error type used by `mimesplit`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MultipartError {
    /// Failure reading the underlying byte source, passed through unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// One-shot accessor misuse.
    #[error(transparent)]
    State(#[from] StateError),
    /// Parse failure.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Configuration error surfaced at runtime.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The message contained more parts than allowed.
    #[error("multipart message exceeded max parts limit of {max_parts}")]
    PartsLimitExceeded {
        /// Maximum allowed number of parts.
        max_parts: usize,
    },
    /// A part header block contained more headers than allowed.
    #[error("part exceeded max headers limit of {max_headers}")]
    HeadersLimitExceeded {
        /// Maximum allowed number of headers per part.
        max_headers: usize,
    },
    /// A single header line was larger than allowed.
    #[error("part header exceeded max header size of {max_header_size} bytes")]
    HeaderSizeLimitExceeded {
        /// Maximum allowed size of one header line in bytes.
        max_header_size: u64,
    },
}
