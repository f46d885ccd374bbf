//! Chaining on pending results.
//!
//! These traits let a whole pipeline be written as one expression:
//!
//! ```no_run
//! # use tinypng::{CompressChain, ImageChain, ResizeOperation, TinyPngClient};
//! # async fn run(client: TinyPngClient) -> Result<(), tinypng::TinyPngError> {
//! let bytes = client
//!     .compress("assets/cat.jpg")
//!     .resize(ResizeOperation::scale_width(150))
//!     .bytes()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! If the pending compression fails, its error is returned and the chained call
//! is never sent. Argument checks of the chained call run before the pending
//! compression is polled.

use std::future::Future;
use std::path::Path;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::TinyPngError;
use crate::resize::{ResizeMethod, ResizeOperation};
use crate::response::{validate_background, validate_preserve, CompressResult, ImageResponse};
use crate::types::{ConvertFormat, PreserveMetadata};

/// Chained operations on a pending [`CompressResult`].
pub trait CompressChain: Future<Output = Result<CompressResult, TinyPngError>> + Send + Sized {
    /// See [`CompressResult::resize`].
    fn resize(
        self,
        operation: ResizeOperation,
    ) -> impl Future<Output = Result<ImageResponse, TinyPngError>> + Send {
        async move { self.await?.resize(operation).await }
    }

    /// See [`CompressResult::resize_to`].
    fn resize_to(
        self,
        width: u32,
        height: u32,
        method: ResizeMethod,
    ) -> impl Future<Output = Result<ImageResponse, TinyPngError>> + Send {
        let operation = ResizeOperation::new(method, width, height);
        async move {
            let operation = operation?;
            self.await?.resize(operation).await
        }
    }

    /// See [`CompressResult::convert`].
    fn convert(
        self,
        format: ConvertFormat,
        background: Option<&str>,
    ) -> impl Future<Output = Result<ImageResponse, TinyPngError>> + Send {
        let checked = validate_background(background).map(|_| background.map(str::to_owned));
        async move {
            let background = checked?;
            self.await?.convert(format, background.as_deref()).await
        }
    }

    /// See [`CompressResult::preserve`].
    fn preserve(
        self,
        metadata: &[PreserveMetadata],
    ) -> impl Future<Output = Result<ImageResponse, TinyPngError>> + Send {
        let checked = validate_preserve(metadata).map(|_| metadata.to_vec());
        async move {
            let metadata = checked?;
            self.await?.preserve(&metadata).await
        }
    }

    /// See [`CompressResult::download`].
    fn download(self) -> impl Future<Output = Result<ImageResponse, TinyPngError>> + Send {
        async move { self.await?.download().await }
    }
}

impl<F> CompressChain for F where F: Future<Output = Result<CompressResult, TinyPngError>> + Send {}

/// Accessors on a pending [`ImageResponse`].
pub trait ImageChain: Future<Output = Result<ImageResponse, TinyPngError>> + Send + Sized {
    /// See [`ImageResponse::bytes`].
    fn bytes(self) -> impl Future<Output = Result<Bytes, TinyPngError>> + Send {
        async move { self.await?.bytes().await }
    }

    /// See [`ImageResponse::into_reader`].
    fn into_reader(
        self,
    ) -> impl Future<Output = Result<impl AsyncRead + Send + Unpin, TinyPngError>> + Send {
        async move { Ok(self.await?.into_reader()) }
    }

    /// See [`ImageResponse::save_to_disk`].
    fn save_to_disk<P>(self, path: P) -> impl Future<Output = Result<(), TinyPngError>> + Send
    where
        P: AsRef<Path> + Send,
    {
        async move { self.await?.save_to_disk(path).await }
    }
}

impl<F> ImageChain for F where F: Future<Output = Result<ImageResponse, TinyPngError>> + Send {}
