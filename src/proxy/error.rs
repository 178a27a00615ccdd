// src/proxy/error.rs
use std::fmt;

/// Classification of a failed translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Timeout,
    Connection,
    Http,
    Decode,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
            ErrorKind::Http => "http",
            ErrorKind::Decode => "decode",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can go wrong between the form and the remote service.
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("Please enter some text to translate.")]
    EmptyInput,

    #[error("Request timed out. The server might be processing or unavailable.")]
    Timeout,

    #[error("Cannot connect to server. Check the remote URL and that the backend is running.")]
    Connection,

    /// `body` holds at most [`BODY_EXCERPT_CHARS`] characters.
    #[error("Server returned status {status}. Response: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response from server. Response: {body}")]
    Decode { body: String },

    #[error("Error: {0}")]
    Unknown(String),
}

/// How much of a remote body is echoed back to the user.
pub const BODY_EXCERPT_CHARS: usize = 200;

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::EmptyInput => ErrorKind::Validation,
            TranslateError::Timeout => ErrorKind::Timeout,
            TranslateError::Connection => ErrorKind::Connection,
            TranslateError::Http { .. } => ErrorKind::Http,
            TranslateError::Decode { .. } => ErrorKind::Decode,
            TranslateError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn http(status: u16, body: &str) -> Self {
        TranslateError::Http {
            status,
            body: truncate_chars(body, BODY_EXCERPT_CHARS).to_string(),
        }
    }

    pub fn decode(body: &str) -> Self {
        TranslateError::Decode {
            body: truncate_chars(body, BODY_EXCERPT_CHARS).to_string(),
        }
    }

    /// Timeouts win over connection errors: a connect that timed out is a timeout.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslateError::Timeout
        } else if err.is_connect() {
            TranslateError::Connection
        } else {
            TranslateError::Unknown(err.to_string())
        }
    }
}

/// First `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
