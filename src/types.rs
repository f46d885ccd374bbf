use serde::{Deserialize, Serialize};

use crate::resize::ResizeOperation;
use crate::storage::S3Configuration;

/// Describes the image that was uploaded for compression.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    /// The size of the uploaded image in bytes.
    pub size: u64,
    /// The detected MIME type, e.g. `"image/png"`.
    #[serde(rename = "type")]
    pub type_: String,
}

/// Describes the compressed image hosted by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOutput {
    /// The size of the compressed image in bytes.
    pub size: u64,
    /// The MIME type of the compressed image.
    #[serde(rename = "type")]
    pub type_: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Compressed size divided by the original size.
    pub ratio: f64,
    /// The temporary URL the compressed image is hosted at.
    ///
    /// Every chained operation targets this URL. It stays valid for as long as
    /// the service keeps the image around.
    pub url: String,
}

/// (Internal) The JSON body of a successful compression.
#[derive(Debug, Deserialize)]
pub(crate) struct ShrinkResponse {
    pub(crate) input: ImageInput,
    pub(crate) output: ImageOutput,
}

/// (Internal) The envelope the API returns with every non-success status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub(crate) error: String,
    #[serde(default)]
    pub(crate) message: String,
}

/// Target formats for [`CompressResult::convert`](crate::CompressResult::convert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConvertFormat {
    /// Lets the service pick the smallest format for the image.
    #[serde(rename = "*/*")]
    Wildcard,
    #[serde(rename = "image/webp")]
    WebP,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

/// Metadata the service can copy from the source image into the compressed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreserveMetadata {
    Copyright,
    Creation,
    Location,
}

#[derive(Serialize)]
pub(crate) struct UrlSource<'a> {
    pub(crate) url: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UrlSourceRequest<'a> {
    pub(crate) source: UrlSource<'a>,
}

#[derive(Serialize)]
pub(crate) struct ResizeRequest<'a> {
    pub(crate) resize: &'a ResizeOperation,
}

#[derive(Serialize)]
pub(crate) struct ConvertType {
    #[serde(rename = "type")]
    pub(crate) type_: ConvertFormat,
}

#[derive(Serialize)]
pub(crate) struct Transform<'a> {
    pub(crate) background: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ConvertRequest<'a> {
    pub(crate) convert: ConvertType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) transform: Option<Transform<'a>>,
}

#[derive(Serialize)]
pub(crate) struct PreserveRequest<'a> {
    pub(crate) preserve: &'a [PreserveMetadata],
}

#[derive(Serialize)]
pub(crate) struct StoreRequest<'a> {
    pub(crate) store: &'a S3Configuration,
}
