use serde::Serialize;

use crate::error::TinyPngError;

/// How the service fits the image into the requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    /// Scales down proportionally so the image fits within width and height.
    #[default]
    Fit,
    /// Scales down proportionally to exactly one target dimension.
    Scale,
    /// Scales and crops to exactly the given width and height.
    Cover,
}

/// A resize request, sent as the `resize` object of a chained call.
///
/// Build one with [`scale_width`](Self::scale_width), [`scale_height`](Self::scale_height),
/// [`fit`](Self::fit), [`cover`](Self::cover), or [`new`](Self::new). The unused
/// dimension of a scale operation is left out of the request entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeOperation {
    method: ResizeMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

impl ResizeOperation {
    /// Scales proportionally to the given width.
    pub fn scale_width(width: u32) -> Self {
        Self {
            method: ResizeMethod::Scale,
            width: Some(width),
            height: None,
        }
    }

    /// Scales proportionally to the given height.
    pub fn scale_height(height: u32) -> Self {
        Self {
            method: ResizeMethod::Scale,
            width: None,
            height: Some(height),
        }
    }

    /// Fits the image within `width` x `height`, keeping its aspect ratio.
    pub fn fit(width: u32, height: u32) -> Self {
        Self {
            method: ResizeMethod::Fit,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Crops the image to exactly `width` x `height`.
    ///
    /// # Errors
    ///
    /// `TinyPngError::InvalidArgument` if either dimension is zero.
    pub fn cover(width: u32, height: u32) -> Result<Self, TinyPngError> {
        if width == 0 {
            return Err(TinyPngError::invalid_argument(
                "width",
                "cover resizing requires a non-zero width",
            ));
        }
        if height == 0 {
            return Err(TinyPngError::invalid_argument(
                "height",
                "cover resizing requires a non-zero height",
            ));
        }
        Ok(Self {
            method: ResizeMethod::Cover,
            width: Some(width),
            height: Some(height),
        })
    }

    /// Builds an operation from a method and both dimensions.
    ///
    /// For [`ResizeMethod::Scale`] both dimensions are sent as given.
    ///
    /// # Errors
    ///
    /// `TinyPngError::OutOfRange` if `width` or `height` is zero.
    pub fn new(method: ResizeMethod, width: u32, height: u32) -> Result<Self, TinyPngError> {
        if width == 0 {
            return Err(TinyPngError::out_of_range("width", "width cannot be 0"));
        }
        if height == 0 {
            return Err(TinyPngError::out_of_range("height", "height cannot be 0"));
        }
        match method {
            ResizeMethod::Cover => Self::cover(width, height),
            method => Ok(Self {
                method,
                width: Some(width),
                height: Some(height),
            }),
        }
    }

    pub fn method(&self) -> ResizeMethod {
        self.method
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }
}
