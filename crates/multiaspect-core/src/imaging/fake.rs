//! Fake codec with controllable dimensions for policy tests.
//!
//! "Encoded" images are ASCII `WxH` with optional `:rgba` / `:luma` mode and
//! `@N` EXIF orientation suffixes, e.g. `b"900x1600:rgba@6"`. Anything else
//! fails to decode.

use image::ImageFormat;
use std::sync::Mutex;

use super::codec::{Dimensions, ImageCodec};
use super::orientation::Orientation;
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
    Rgb,
    Rgba,
    Luma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeImage {
    pub width: u32,
    pub height: u32,
    pub mode: FakeMode,
    pub orientation: Orientation,
}

impl FakeImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mode: FakeMode::Rgb,
            orientation: Orientation::Normal,
        }
    }

    pub fn with_mode(mut self, mode: FakeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Decode,
    ToRgb,
    Reorient,
    Resize(Dimensions),
    Encode,
}

/// Records every call; uses Mutex so the codec stays Sync.
#[derive(Default)]
pub struct FakeCodec {
    pub operations: Mutex<Vec<RecordedOp>>,
}

impl FakeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_operations(&self) -> Vec<RecordedOp> {
        self.operations.lock().unwrap().clone()
    }

    fn record(&self, op: RecordedOp) {
        self.operations.lock().unwrap().push(op);
    }

    fn parse(text: &str) -> Option<FakeImage> {
        let (rest, orientation) = match text.split_once('@') {
            Some((rest, o)) => (rest, Orientation::from_exif(o.parse().ok()?)),
            None => (text, Orientation::Normal),
        };
        let (size, mode) = match rest.split_once(':') {
            Some((size, "rgba")) => (size, FakeMode::Rgba),
            Some((size, "luma")) => (size, FakeMode::Luma),
            Some(_) => return None,
            None => (rest, FakeMode::Rgb),
        };
        let (w, h) = size.split_once('x')?;
        Some(
            FakeImage::new(w.parse().ok()?, h.parse().ok()?)
                .with_mode(mode)
                .with_orientation(orientation),
        )
    }
}

impl ImageCodec for FakeCodec {
    type Image = FakeImage;

    fn decode(&self, bytes: &[u8]) -> Result<FakeImage, CodecError> {
        self.record(RecordedOp::Decode);
        std::str::from_utf8(bytes)
            .ok()
            .and_then(Self::parse)
            .ok_or_else(|| CodecError::Decode("not a fake image".to_string()))
    }

    fn dimensions(&self, image: &FakeImage) -> Dimensions {
        Dimensions::new(image.width, image.height)
    }

    fn to_rgb(&self, image: FakeImage) -> FakeImage {
        self.record(RecordedOp::ToRgb);
        image.with_mode(FakeMode::Rgb)
    }

    fn reorient(&self, image: FakeImage) -> FakeImage {
        self.record(RecordedOp::Reorient);
        let dims = Dimensions::new(image.width, image.height);
        let dims = if image.orientation.swaps_dimensions() {
            dims.swapped()
        } else {
            dims
        };
        FakeImage {
            width: dims.width,
            height: dims.height,
            orientation: Orientation::Normal,
            ..image
        }
    }

    fn resize(&self, image: FakeImage, target: Dimensions) -> FakeImage {
        self.record(RecordedOp::Resize(target));
        FakeImage {
            width: target.width,
            height: target.height,
            ..image
        }
    }

    fn encode(&self, image: &FakeImage, _format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        self.record(RecordedOp::Encode);
        Ok(format!("{}x{}", image.width, image.height).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_decode_parses_suffixes() {
        let codec = FakeCodec::new();
        let img = codec.decode(b"900x1600:rgba@6").unwrap();
        assert_eq!(img.width, 900);
        assert_eq!(img.height, 1600);
        assert_eq!(img.mode, FakeMode::Rgba);
        assert_eq!(img.orientation, Orientation::Rotate90);
        assert!(codec.decode(b"garbage").is_err());
        assert!(codec.decode(b"10x10:cmyk").is_err());
        assert_eq!(codec.get_operations(), vec![RecordedOp::Decode; 3]);
    }
}
