use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use tokio::io::AsyncRead;
use url::Url;

/// The image to compress.
///
/// Most callers never name this type: [`TinyPngClient::compress`](crate::TinyPngClient::compress)
/// accepts anything that converts into it. A `&str` or `String` starting with
/// `http://` or `https://` becomes [`Source::Url`]; anything else is a file path.
pub enum Source {
    /// A local file. It is read fully and closed before the upload starts.
    Path(PathBuf),
    /// Image bytes already in memory.
    Bytes(Bytes),
    /// An async reader streamed as the request body.
    Stream(Pin<Box<dyn AsyncRead + Send + Sync>>),
    /// A publicly reachable image the service fetches itself.
    Url(String),
}

impl Source {
    /// Wraps an async reader, e.g. an open `tokio::fs::File`.
    pub fn stream<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self::Stream(Box::pin(reader))
    }

    fn from_text(value: String) -> Self {
        if has_scheme(&value, "http://") || has_scheme(&value, "https://") {
            Self::Url(value)
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .get(..scheme.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Self::from_text(value.to_string())
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        Self::from_text(value)
    }
}

impl From<&Path> for Source {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&PathBuf> for Source {
    fn from(value: &PathBuf) -> Self {
        Self::Path(value.clone())
    }
}

impl From<Vec<u8>> for Source {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Source {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Bytes> for Source {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Url> for Source {
    fn from(value: Url) -> Self {
        Self::Url(value.into())
    }
}
