//! Production codec backed by the `image` crate.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use super::codec::{Dimensions, ImageCodec};
use super::orientation::Orientation;
use crate::config::LimitsConfig;
use crate::error::CodecError;

/// A decoded image together with the EXIF orientation it has not yet had
/// applied.
#[derive(Debug, Clone)]
pub struct OrientedImage {
    pub image: DynamicImage,
    pub orientation: Orientation,
}

impl OrientedImage {
    /// Wrap an image that is already upright.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            orientation: Orientation::Normal,
        }
    }

    pub fn with_orientation(image: DynamicImage, orientation: Orientation) -> Self {
        Self { image, orientation }
    }

    pub fn into_inner(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for OrientedImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// Codec using `image` for pixels and `kamadak-exif` for orientation.
#[derive(Debug, Clone, Default)]
pub struct RustCodec {
    limits: LimitsConfig,
}

impl RustCodec {
    /// Create a codec with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    fn decode_pixels(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::UnknownFormat(e.to_string()))?;
        if reader.format().is_none() {
            return Err(CodecError::UnknownFormat(
                "no known signature in leading bytes".to_string(),
            ));
        }

        let image = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(CodecError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }
        Ok(image)
    }
}

impl ImageCodec for RustCodec {
    type Image = OrientedImage;

    fn decode(&self, bytes: &[u8]) -> Result<OrientedImage, CodecError> {
        let image = self.decode_pixels(bytes)?;
        let orientation = Orientation::read_from_bytes(bytes);
        Ok(OrientedImage::with_orientation(image, orientation))
    }

    fn dimensions(&self, image: &OrientedImage) -> Dimensions {
        image.image.dimensions().into()
    }

    fn to_rgb(&self, image: OrientedImage) -> OrientedImage {
        if matches!(image.image, DynamicImage::ImageRgb8(_)) {
            return image;
        }
        let rgb = image.image.to_rgb8();
        OrientedImage::with_orientation(DynamicImage::ImageRgb8(rgb), image.orientation)
    }

    fn reorient(&self, image: OrientedImage) -> OrientedImage {
        OrientedImage::new(image.orientation.apply(image.image))
    }

    fn resize(&self, image: OrientedImage, target: Dimensions) -> OrientedImage {
        let resized = image
            .image
            .resize_exact(target.width, target.height, FilterType::CatmullRom);
        OrientedImage::with_orientation(resized, image.orientation)
    }

    fn encode(&self, image: &OrientedImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .image
            .write_to(&mut buffer, format)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::imaging::orientation::tests::with_exif_orientation;
    use image::{Rgba, RgbaImage};

    /// Encode a blank RGB image of the given size.
    pub(crate) fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let codec = RustCodec::default();
        let img = OrientedImage::new(DynamicImage::new_rgb8(width, height));
        codec.encode(&img, format).unwrap()
    }

    #[test]
    fn test_decode_png() {
        let codec = RustCodec::default();
        let bytes = encoded(40, 20, ImageFormat::Png);
        let img = codec.decode(&bytes).unwrap();
        assert_eq!(codec.dimensions(&img), Dimensions::new(40, 20));
        assert_eq!(img.orientation, Orientation::Normal);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let codec = RustCodec::default();
        let err = codec.decode(b"definitely not pixels").unwrap_err();
        assert!(matches!(err, CodecError::UnknownFormat(_)));
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let codec = RustCodec::default();
        let bytes = encoded(40, 20, ImageFormat::Png);
        let err = codec.decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_decode_respects_max_dimension() {
        let codec = RustCodec::new(LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        });
        let bytes = encoded(40, 20, ImageFormat::Png);
        let err = codec.decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ImageTooLarge {
                width: 40,
                height: 20,
                max_dim: 32
            }
        ));
    }

    #[test]
    fn test_decode_reads_exif_orientation() {
        let codec = RustCodec::default();
        let jpeg = with_exif_orientation(&encoded(40, 20, ImageFormat::Jpeg), 6);
        let img = codec.decode(&jpeg).unwrap();
        assert_eq!(img.orientation, Orientation::Rotate90);
        // Pixels are still stored sideways until reoriented
        assert_eq!(codec.dimensions(&img), Dimensions::new(40, 20));

        let upright = codec.reorient(img);
        assert_eq!(upright.orientation, Orientation::Normal);
        assert_eq!(codec.dimensions(&upright), Dimensions::new(20, 40));

        // Orientation is cleared, so a second pass changes nothing
        let again = codec.reorient(upright);
        assert_eq!(codec.dimensions(&again), Dimensions::new(20, 40));
    }

    #[test]
    fn test_to_rgb_drops_alpha_and_keeps_orientation() {
        let codec = RustCodec::default();
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        let img = OrientedImage::with_orientation(
            DynamicImage::ImageRgba8(rgba),
            Orientation::Rotate180,
        );

        let rgb = codec.to_rgb(img);
        assert!(matches!(rgb.image, DynamicImage::ImageRgb8(_)));
        assert_eq!(rgb.orientation, Orientation::Rotate180);
        assert_eq!(rgb.image.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_resize_exact() {
        let codec = RustCodec::default();
        let img = OrientedImage::new(DynamicImage::new_rgb8(160, 90));
        let out = codec.resize(img, Dimensions::new(182, 102));
        assert_eq!(codec.dimensions(&out), Dimensions::new(182, 102));
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encoded(8, 8, ImageFormat::Png);
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
