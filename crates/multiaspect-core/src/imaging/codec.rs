//! The [`ImageCodec`] trait and shared types.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CodecError;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions with width and height exchanged.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Narrow decode/transform/encode capability over some image handle type.
///
/// Transforms consume the handle and return a new one; source bytes are
/// never touched after `decode`.
pub trait ImageCodec {
    /// In-memory decoded image, including any pending orientation.
    type Image;

    /// Decode raw bytes into a handle.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, CodecError>;

    /// Current pixel dimensions of the handle.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Convert to three-channel color. Idempotent.
    fn to_rgb(&self, image: Self::Image) -> Self::Image;

    /// Apply the pending EXIF orientation and clear it. Idempotent.
    fn reorient(&self, image: Self::Image) -> Self::Image;

    /// Resample to exactly `target` with a bicubic filter.
    fn resize(&self, image: Self::Image, target: Dimensions) -> Self::Image;

    /// Encode the handle in `format`.
    fn encode(&self, image: &Self::Image, format: ImageFormat) -> Result<Vec<u8>, CodecError>;
}
