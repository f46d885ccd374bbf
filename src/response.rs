use std::fmt;
use std::io;
use std::path::Path;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Response;
use serde::Serialize;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio_util::io::StreamReader;
use url::Url;

use crate::error::TinyPngError;
use crate::resize::{ResizeMethod, ResizeOperation};
use crate::transport::{compression_count, header_u32, Transport};
use crate::types::{
    ConvertFormat, ConvertRequest, ConvertType, ImageInput, ImageOutput, PreserveMetadata,
    PreserveRequest, ResizeRequest, ShrinkResponse, Transform,
};

static BACKGROUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap()
});

/// The result of a successful compression.
///
/// Holds the API's description of the uploaded and compressed images, and the
/// authenticated transport used to produce them. Resize, convert, preserve and
/// download are issued against [`ImageOutput::url`] with that same transport.
#[derive(Clone)]
pub struct CompressResult {
    /// The uploaded image.
    pub input: ImageInput,
    /// The compressed image hosted by the API.
    pub output: ImageOutput,
    /// The number of compressions made with this API key this month.
    pub compression_count: u32,
    transport: Transport,
}

impl fmt::Debug for CompressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressResult")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("compression_count", &self.compression_count)
            .finish_non_exhaustive()
    }
}

impl CompressResult {
    /// Reads and parses a successful `/shrink` response.
    pub(crate) async fn from_response(
        response: Response,
        transport: Transport,
    ) -> Result<Self, TinyPngError> {
        let compression_count = compression_count(response.headers());
        let body = response.bytes().await?;
        let parsed: ShrinkResponse = serde_json::from_slice(&body)?;

        tracing::info!(
            input_size = parsed.input.size,
            output_size = parsed.output.size,
            ratio = parsed.output.ratio,
            compression_count,
            "image compressed"
        );

        Ok(Self {
            input: parsed.input,
            output: parsed.output,
            compression_count,
            transport,
        })
    }

    pub(crate) fn output_url(&self) -> Result<Url, TinyPngError> {
        Ok(Url::parse(&self.output.url)?)
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Resizes the compressed image.
    pub async fn resize(&self, operation: ResizeOperation) -> Result<ImageResponse, TinyPngError> {
        tracing::debug!(?operation, "resizing compressed image");
        self.post_to_output(&ResizeRequest {
            resize: &operation,
        })
        .await
    }

    /// Resizes to `width` x `height` with the given method.
    ///
    /// # Errors
    ///
    /// `TinyPngError::OutOfRange` if either dimension is zero; no request is sent.
    pub async fn resize_to(
        &self,
        width: u32,
        height: u32,
        method: ResizeMethod,
    ) -> Result<ImageResponse, TinyPngError> {
        let operation = ResizeOperation::new(method, width, height)?;
        self.resize(operation).await
    }

    /// Converts the compressed image to another format.
    ///
    /// `background` fills transparent areas when converting to a format without
    /// an alpha channel, and must look like `#RRGGBB`. An empty string counts as
    /// no background.
    ///
    /// # Errors
    ///
    /// `TinyPngError::OutOfRange` for a malformed background; no request is sent.
    pub async fn convert(
        &self,
        format: ConvertFormat,
        background: Option<&str>,
    ) -> Result<ImageResponse, TinyPngError> {
        let background = background.filter(|value| !value.is_empty());
        validate_background(background)?;
        tracing::debug!(?format, ?background, "converting compressed image");
        self.post_to_output(&ConvertRequest {
            convert: ConvertType { type_: format },
            transform: background.map(|background| Transform { background }),
        })
        .await
    }

    /// Copies the selected metadata from the source image into the compressed one.
    ///
    /// # Errors
    ///
    /// `TinyPngError::InvalidArgument` if `metadata` is empty; no request is sent.
    pub async fn preserve(
        &self,
        metadata: &[PreserveMetadata],
    ) -> Result<ImageResponse, TinyPngError> {
        validate_preserve(metadata)?;
        tracing::debug!(?metadata, "preserving metadata");
        self.post_to_output(&PreserveRequest { preserve: metadata })
            .await
    }

    /// Downloads the compressed image as is.
    pub async fn download(&self) -> Result<ImageResponse, TinyPngError> {
        let url = self.output_url()?;
        tracing::debug!(%url, "downloading compressed image");
        let response = self.transport.send(self.transport.get(url)).await?;
        Ok(ImageResponse::new(response))
    }

    async fn post_to_output<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<ImageResponse, TinyPngError> {
        let url = self.output_url()?;
        let response = self
            .transport
            .send(self.transport.post(url).json(body))
            .await?;
        Ok(ImageResponse::new(response))
    }
}

pub(crate) fn validate_background(background: Option<&str>) -> Result<(), TinyPngError> {
    match background {
        Some(value) if !value.is_empty() && !BACKGROUND_RE.is_match(value) => Err(TinyPngError::out_of_range(
            "background",
            "if supplied, background should be a 6 character hex value including the hash, e.g. #000FFF",
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_preserve(metadata: &[PreserveMetadata]) -> Result<(), TinyPngError> {
    if metadata.is_empty() {
        return Err(TinyPngError::invalid_argument(
            "metadata",
            "at least one metadata kind must be selected",
        ));
    }
    Ok(())
}

/// A response whose body is image data: a download, resize, convert or preserve.
#[derive(Debug)]
pub struct ImageResponse {
    response: Response,
    compression_count: u32,
}

impl ImageResponse {
    pub(crate) fn new(response: Response) -> Self {
        let compression_count = compression_count(response.headers());
        Self {
            response,
            compression_count,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// The MIME type of the image, from `Content-Type`.
    pub fn content_type(&self) -> Option<&str> {
        self.response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Width echoed by the API in `Image-Width`, if present.
    pub fn image_width(&self) -> Option<u32> {
        header_u32(self.response.headers(), "image-width")
    }

    /// Height echoed by the API in `Image-Height`, if present.
    pub fn image_height(&self) -> Option<u32> {
        header_u32(self.response.headers(), "image-height")
    }

    pub fn compression_count(&self) -> u32 {
        self.compression_count
    }

    /// Reads the whole image into memory.
    pub async fn bytes(self) -> Result<Bytes, TinyPngError> {
        Ok(self.response.bytes().await?)
    }

    /// Streams the image body in chunks.
    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> + Send {
        self.response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    /// Exposes the image body as an [`AsyncRead`].
    pub fn into_reader(self) -> impl AsyncRead + Send + Unpin {
        StreamReader::new(Box::pin(self.into_stream()))
    }

    /// Writes the image to `path`, replacing any existing file.
    pub async fn save_to_disk<P: AsRef<Path>>(self, path: P) -> Result<(), TinyPngError> {
        let path = path.as_ref();
        let content = self.bytes().await?;
        let mut file = fs::File::create(path).await?;
        file.write_all(&content).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), size = content.len(), "saved image to disk");
        Ok(())
    }
}
