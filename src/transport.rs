use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use url::Url;

use crate::error::{ApiError, TinyPngError};
use crate::types::ErrorEnvelope;

const COMPRESSION_COUNT: &str = "compression-count";

/// (Internal) The authenticated HTTP handle shared by a client and every result it produces.
///
/// `reqwest::Client` is reference counted, so cloning a `Transport` reuses the
/// same connection pool.
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    auth: HeaderValue,
}

impl Transport {
    pub(crate) fn new(api_key: &str, http: reqwest::Client) -> Result<Self, TinyPngError> {
        let encoded = general_purpose::STANDARD.encode(format!("api:{}", api_key));
        let mut auth = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|_| TinyPngError::invalid_argument("api_key", "not a valid header value"))?;
        auth.set_sensitive(true);

        Ok(Self { http, auth })
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url).header(AUTHORIZATION, self.auth.clone())
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).header(AUTHORIZATION, self.auth.clone())
    }

    /// Sends the request and turns any non-success status into [`TinyPngError::Api`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, TinyPngError> {
        let response = request.send().await?;
        tracing::debug!(url = %response.url(), status = %response.status(), "received API response");
        ensure_success(response).await
    }
}

/// Passes a 2xx response through; otherwise reads the error envelope.
///
/// A body that is not valid JSON surfaces as `ResponseParseFailed`.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, TinyPngError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await?;
    let envelope: ErrorEnvelope = serde_json::from_slice(&body)?;
    let error = ApiError {
        status_code: status.as_u16(),
        reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
        title: envelope.error,
        message: envelope.message,
    };
    tracing::warn!(
        status = error.status_code,
        title = %error.title,
        message = %error.message,
        "API request failed"
    );
    Err(error.into())
}

/// Reads `Compression-Count`, falling back to 0 when absent or unparsable.
pub(crate) fn compression_count(headers: &HeaderMap) -> u32 {
    header_u32(headers, COMPRESSION_COUNT).unwrap_or(0)
}

pub(crate) fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
