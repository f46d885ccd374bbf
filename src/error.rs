use std::fmt;

/// Represents the possible errors that can occur when using the TinyPNG client.
#[derive(Debug, thiserror::Error)]
pub enum TinyPngError {
    /// The API key was empty, or `TINYPNG_API_KEY` was not set.
    #[error("API key is missing. Please provide it or set the TINYPNG_API_KEY environment variable.")]
    MissingApiKey,
    /// A required argument was empty or otherwise unusable. Raised before any request is sent.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    /// An argument was outside its permitted range. Raised before any request is sent.
    #[error("Argument `{name}` out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },
    /// The client is missing configuration the operation depends on.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// The API answered with a non-success status code.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A successful response lacked a header the operation relies on.
    #[error("Response is missing the `{0}` header")]
    MissingHeader(&'static str),
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// The AWS credential chain could not produce credentials or a region.
    #[error("Failed to resolve AWS credentials: {0}")]
    Credentials(String),
}

impl TinyPngError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(name: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            name,
            reason: reason.into(),
        }
    }

    /// Returns the remote error details when this is an [`ApiError`].
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// A non-success response from the API, normalized from the `{error, message}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The HTTP status code.
    pub status_code: u16,
    /// The reason phrase for the status code.
    pub reason_phrase: String,
    /// The short error title, e.g. `"Unauthorized"`.
    pub title: String,
    /// The human-readable description supplied by the server.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Api Service returned a non-success status code when attempting an operation on an image: {} - {}. {}, {}",
            self.status_code, self.reason_phrase, self.title, self.message
        )
    }
}

impl std::error::Error for ApiError {}
