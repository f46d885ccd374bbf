//! An unofficial Rust client for the TinyPNG (Tinify) image compression API.
//!
//! The client uploads an image, gets back a description of the compressed
//! version hosted by the service, and can then chain further operations
//! against that hosted image: resizing, format conversion, metadata
//! preservation, downloading, and storing straight into Amazon S3.
//!
//! ## Features
//! - Compression from files, bytes, async readers, or remote URLs.
//! - Chained operations that reuse the authenticated connection of the compression.
//! - Extension traits to chain directly on pending futures.
//! - A single typed error with structured API error details.
//!
//! ```no_run
//! use tinypng::{CompressChain, ConvertFormat, TinyPngClient};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = TinyPngClient::from_env()?;
//!
//! let webp = client
//!     .compress("assets/cat.png")
//!     .convert(ConvertFormat::WebP, None)
//!     .await?;
//! println!("converted to {:?}", webp.content_type());
//! webp.save_to_disk("cat.webp").await?;
//! # Ok(())
//! # }
//! ```

mod chain;
mod client;
mod error;
mod resize;
mod response;
mod source;
mod storage;
mod transport;
mod types;

pub use chain::{CompressChain, ImageChain};
pub use client::TinyPngClient;
pub use error::{ApiError, TinyPngError};
pub use resize::{ResizeMethod, ResizeOperation};
pub use response::{CompressResult, ImageResponse};
pub use source::Source;
pub use storage::S3Configuration;
pub use types::{ConvertFormat, ImageInput, ImageOutput, PreserveMetadata};
