use std::env;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::Body;
use tokio::fs;
use tokio_util::codec::{BytesCodec, FramedRead};
use url::Url;

use crate::error::TinyPngError;
use crate::response::CompressResult;
use crate::source::Source;
use crate::storage::S3Configuration;
use crate::transport::Transport;
use crate::types::{StoreRequest, UrlSource, UrlSourceRequest};

const DEFAULT_API_URL: &str = "https://api.tinify.com/";
const API_KEY_VAR: &str = "TINYPNG_API_KEY";

/// The main client for interacting with the TinyPNG API.
///
/// It holds the authenticated `reqwest::Client`, the API base URL, and an
/// optional default [`S3Configuration`] used by [`store`](Self::store).
/// Cloning is cheap and clones share one connection pool.
#[derive(Clone)]
pub struct TinyPngClient {
    transport: Transport,
    base_url: Url,
    s3_configuration: Option<S3Configuration>,
}

impl TinyPngClient {
    /// Creates a new `TinyPngClient` talking to `https://api.tinify.com`.
    ///
    /// # Errors
    ///
    /// - `TinyPngError::MissingApiKey` if `api_key` is empty.
    /// - `TinyPngError::RequestFailed` if the internal HTTP client fails to build.
    pub fn new(api_key: &str) -> Result<Self, TinyPngError> {
        Self::new_with_url(api_key, DEFAULT_API_URL)
    }

    /// Creates a client from the `TINYPNG_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, TinyPngError> {
        let api_key = env::var(API_KEY_VAR).map_err(|_| TinyPngError::MissingApiKey)?;
        Self::new(&api_key)
    }

    /// Creates a new `TinyPngClient` with a custom base URL.
    ///
    /// This is useful for testing against a mock server.
    ///
    /// # Errors
    ///
    /// - `TinyPngError::MissingApiKey` if `api_key` is empty.
    /// - `TinyPngError::RequestFailed` if the internal HTTP client fails to build.
    /// - `TinyPngError::UrlParseFailed` if `base_url` is invalid.
    pub fn new_with_url(api_key: &str, base_url: &str) -> Result<Self, TinyPngError> {
        if api_key.is_empty() {
            return Err(TinyPngError::MissingApiKey);
        }
        let http = reqwest::Client::builder().build()?;
        Self::with_http_client_and_url(api_key, http, base_url)
    }

    /// Creates a client on top of an existing `reqwest::Client`.
    ///
    /// The caller keeps its own handle; dropping the `TinyPngClient` only drops
    /// this clone of it.
    pub fn with_http_client(api_key: &str, http: reqwest::Client) -> Result<Self, TinyPngError> {
        Self::with_http_client_and_url(api_key, http, DEFAULT_API_URL)
    }

    /// Creates a client on top of an existing `reqwest::Client` and a custom base URL.
    pub fn with_http_client_and_url(
        api_key: &str,
        http: reqwest::Client,
        base_url: &str,
    ) -> Result<Self, TinyPngError> {
        if api_key.is_empty() {
            return Err(TinyPngError::MissingApiKey);
        }

        Ok(Self {
            transport: Transport::new(api_key, http)?,
            base_url: Url::parse(base_url)?,
            s3_configuration: None,
        })
    }

    /// Installs default S3 settings for [`store`](Self::store).
    pub fn with_s3_configuration(mut self, configuration: S3Configuration) -> Self {
        self.s3_configuration = Some(configuration);
        self
    }

    /// Replaces (or clears) the default S3 settings.
    pub fn set_s3_configuration(&mut self, configuration: Option<S3Configuration>) {
        self.s3_configuration = configuration;
    }

    pub fn s3_configuration(&self) -> Option<&S3Configuration> {
        self.s3_configuration.as_ref()
    }

    /// Compresses an image.
    ///
    /// `source` can be a file path, a URL string, bytes, a [`Url`], or a
    /// [`Source::stream`]. See [`Source`] for how strings are interpreted.
    ///
    /// # Returns
    ///
    /// A [`CompressResult`] that chained operations can be issued against.
    ///
    /// # Errors
    ///
    /// - `TinyPngError::InvalidArgument` for an empty path, URL, or byte buffer.
    ///   Nothing is sent.
    /// - `TinyPngError::Api` if the service rejects the image.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tinypng::{ResizeOperation, TinyPngClient};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let client = TinyPngClient::new("your_api_key")?;
    /// let compressed = client.compress("assets/cat.jpg").await?;
    /// println!("{} -> {} bytes", compressed.input.size, compressed.output.size);
    ///
    /// compressed
    ///     .resize(ResizeOperation::fit(150, 150))
    ///     .await?
    ///     .save_to_disk("cat-150.jpg")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn compress(&self, source: impl Into<Source>) -> Result<CompressResult, TinyPngError> {
        let source = source.into();
        let endpoint = self.base_url.join("shrink")?;

        let request = match source {
            Source::Path(path) => {
                if path.as_os_str().is_empty() {
                    return Err(TinyPngError::invalid_argument("path", "path cannot be empty"));
                }
                let data = fs::read(&path).await?;
                if data.is_empty() {
                    return Err(TinyPngError::invalid_argument("path", "file is empty"));
                }
                let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
                tracing::debug!(path = %path.display(), size = data.len(), "compressing file");
                self.transport
                    .post(endpoint)
                    .header(CONTENT_TYPE, mime_type.as_ref())
                    .body(data)
            }
            Source::Bytes(data) => {
                if data.is_empty() {
                    return Err(TinyPngError::invalid_argument("data", "image data cannot be empty"));
                }
                tracing::debug!(size = data.len(), "compressing bytes");
                self.transport.post(endpoint).body(data)
            }
            Source::Stream(reader) => {
                tracing::debug!("compressing stream");
                let stream = FramedRead::new(reader, BytesCodec::new());
                self.transport.post(endpoint).body(Body::wrap_stream(stream))
            }
            Source::Url(url) => {
                if url.trim().is_empty() {
                    return Err(TinyPngError::invalid_argument("url", "url cannot be empty"));
                }
                let url = Url::parse(&url)?;
                tracing::debug!(%url, "compressing remote image");
                self.transport.post(endpoint).json(&UrlSourceRequest {
                    source: UrlSource { url: url.as_str() },
                })
            }
        };

        let response = self.transport.send(request).await?;
        CompressResult::from_response(response, self.transport.clone()).await
    }

    /// Stores a compressed image directly in Amazon S3 using explicit settings.
    ///
    /// `settings` is left untouched; `path` is applied to a copy.
    ///
    /// # Returns
    ///
    /// The URL of the stored object, taken from the `Location` response header.
    ///
    /// # Errors
    ///
    /// - `TinyPngError::InvalidArgument` if `path` is empty. Nothing is sent.
    /// - `TinyPngError::MissingHeader` if the service did not return a `Location`.
    pub async fn store_to_s3(
        &self,
        result: &CompressResult,
        settings: &S3Configuration,
        path: &str,
    ) -> Result<Url, TinyPngError> {
        if path.is_empty() {
            return Err(TinyPngError::invalid_argument("path", "path cannot be empty"));
        }

        let mut settings = settings.clone();
        settings.path = path.to_string();

        let url = result.output_url()?;
        tracing::debug!(bucket_path = %settings.bucket_path(), region = %settings.region, "storing image in S3");

        let transport = result.transport();
        let response = transport
            .send(transport.post(url).json(&StoreRequest { store: &settings }))
            .await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(TinyPngError::MissingHeader("Location"))?;

        Ok(Url::parse(location)?)
    }

    /// Stores a compressed image in S3 using the client's default settings.
    ///
    /// `bucket_override` and `region_override` replace the defaults for this call
    /// only; empty overrides are ignored.
    ///
    /// # Errors
    ///
    /// - `TinyPngError::InvalidOperation` if no default [`S3Configuration`] is set.
    /// - `TinyPngError::InvalidArgument` if `path` is empty.
    pub async fn store(
        &self,
        result: &CompressResult,
        path: &str,
        bucket_override: Option<&str>,
        region_override: Option<&str>,
    ) -> Result<Url, TinyPngError> {
        let defaults = self.s3_configuration.as_ref().ok_or_else(|| {
            TinyPngError::InvalidOperation("S3 configuration has not been configured".into())
        })?;
        if path.is_empty() {
            return Err(TinyPngError::invalid_argument("path", "path cannot be empty"));
        }

        let mut settings = defaults.clone();
        if let Some(bucket) = bucket_override.filter(|b| !b.is_empty()) {
            settings.bucket = bucket.to_string();
        }
        if let Some(region) = region_override.filter(|r| !r.is_empty()) {
            settings.region = region.to_string();
        }

        self.store_to_s3(result, &settings, path).await
    }
}
