use std::fmt;

/// An HTTP response with a status code outside the success range.
///
/// The transport produces this value verbatim; it carries the literal status
/// code and response bytes and makes no attempt at interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawHttpStatusError {
    pub status_code: u16,
    pub raw_response: Vec<u8>,
}

impl RawHttpStatusError {
    pub fn new(status_code: u16, raw_response: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            raw_response: raw_response.into(),
        }
    }
}

impl fmt::Display for RawHttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error Code: {}\nRaw Response: {}",
            self.status_code,
            String::from_utf8_lossy(&self.raw_response)
        )
    }
}

impl std::error::Error for RawHttpStatusError {}

/// Error type returned by every connection and client in this crate.
///
/// The set is flat: callers match on the variant to decide what to show the
/// user. HTTP-status variants always keep the original status and body,
/// reachable through [`Error::raw_status`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server rejected the access token (401 with an invalid-token body).
    #[error("{message}")]
    InvalidAuthToken {
        message: String,
        raw: RawHttpStatusError,
    },
    /// A non-success response whose body matched the API's error schema.
    #[error("Error Type: {error_type}\nDescription: {description}")]
    Api {
        error_type: String,
        description: String,
        raw: RawHttpStatusError,
    },
    /// A non-success response that could not be classified.
    #[error(transparent)]
    RawHttpStatus(RawHttpStatusError),
    /// TLS verification of the server certificate failed.
    #[error("x509: certificate signed by unknown authority")]
    UnverifiedServer { url: String },
    /// Any other failure before a response was received.
    #[error("{0}")]
    Request(reqwest::Error),
    /// A success response whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// A request payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
    /// No route is registered under the requested name.
    #[error("unknown request name '{name}'")]
    UnknownRequest { name: String },
    /// A path template parameter was not supplied.
    #[error("request '{request}' is missing path parameter '{param}'")]
    MissingPathParam { request: String, param: String },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// A request was issued on a connection chain with no transport bound.
    #[error("connection chain has no transport bound")]
    UnboundConnection,
    #[error("connection chain is already bound")]
    AlreadyBound,
}

impl Error {
    /// Returns the status code and body behind any HTTP-status error,
    /// classified or not.
    pub fn raw_status(&self) -> Option<&RawHttpStatusError> {
        match self {
            Error::InvalidAuthToken { raw, .. }
            | Error::Api { raw, .. }
            | Error::RawHttpStatus(raw) => Some(raw),
            _ => None,
        }
    }

    /// True for errors that indicate a programming or wiring bug rather than
    /// a runtime condition. These are never worth retrying.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownRequest { .. }
                | Error::MissingPathParam { .. }
                | Error::InvalidUrl(_)
                | Error::InvalidHeader(_)
                | Error::Encode(_)
                | Error::UnboundConnection
                | Error::AlreadyBound
        )
    }
}

impl From<RawHttpStatusError> for Error {
    fn from(raw: RawHttpStatusError) -> Self {
        Error::RawHttpStatus(raw)
    }
}
