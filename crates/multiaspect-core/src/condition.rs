//! Condition-image preparation.
//!
//! A condition image is normalized to three-channel color, turned upright,
//! and resized so its constrained side equals the target resolution:
//!
//! ```text
//! ar = round(W / H, 2)
//! W < H  →  (R, floor(R / ar))
//! H < W  →  (floor(R * ar), R)
//! then, if the two sides are equal, (R, R)
//! ```
//!
//! When the computed size matches the current one the image is returned
//! without resampling.

use image::ImageFormat;

use crate::bucket::aspect_ratio;
use crate::config::ConditionConfig;
use crate::error::{ConditionError, Result};
use crate::imaging::{Dimensions, ImageCodec, RustCodec};

/// Decimal digits of the aspect ratio used by the resize policy, independent
/// of the bucket rounding.
pub const CONDITION_RATIO_DIGITS: u32 = 2;

/// Compute the condition-image size for `current` at `resolution`.
pub fn condition_target(
    current: Dimensions,
    resolution: u32,
) -> std::result::Result<Dimensions, ConditionError> {
    if resolution == 0 {
        return Err(ConditionError::InvalidResolution);
    }
    let ratio = aspect_ratio(current, CONDITION_RATIO_DIGITS)
        .filter(|r| *r > 0.0)
        .ok_or(ConditionError::DegenerateAspectRatio {
            width: current.width,
            height: current.height,
        })?;

    let res = u64::from(resolution);
    let mut width = u64::from(current.width);
    let mut height = u64::from(current.height);

    if width < height {
        width = res;
        height = (f64::from(resolution) / ratio).floor() as u64;
    } else if height < width {
        height = res;
        width = (f64::from(resolution) * ratio).floor() as u64;
    }
    // Applies to originally square images and to scaled sides that landed on
    // the same integer.
    if width == height {
        width = res;
        height = res;
    }

    let side = |v: u64| u32::try_from(v).ok().filter(|v| *v > 0);
    match (side(width), side(height)) {
        (Some(w), Some(h)) => Ok(Dimensions::new(w, h)),
        _ => Err(ConditionError::DegenerateTarget {
            width,
            height,
            resolution,
        }),
    }
}

/// Convert to RGB and resize per [`condition_target`].
///
/// Returns the input handle untouched when no resample is needed.
pub fn resize_for_condition<C: ImageCodec>(
    codec: &C,
    image: C::Image,
    resolution: u32,
) -> std::result::Result<C::Image, ConditionError> {
    let image = codec.to_rgb(image);
    let current = codec.dimensions(&image);
    let target = condition_target(current, resolution)?;
    if target == current {
        return Ok(image);
    }

    tracing::debug!(
        "Resizing image of aspect {:?} and size {} to its new size: {}.",
        aspect_ratio(current, CONDITION_RATIO_DIGITS),
        current,
        target
    );
    Ok(codec.resize(image, target))
}

/// Strip transparency, apply EXIF orientation, then [`resize_for_condition`].
pub fn prepare_condition_image<C: ImageCodec>(
    codec: &C,
    image: C::Image,
    resolution: u32,
) -> std::result::Result<C::Image, ConditionError> {
    let image = codec.to_rgb(image);
    let image = codec.reorient(image);
    resize_for_condition(codec, image, resolution)
}

/// A codec paired with a default target resolution.
#[derive(Debug, Clone)]
pub struct ConditionPreparer<C = RustCodec> {
    codec: C,
    resolution: u32,
}

impl<C: ImageCodec> ConditionPreparer<C> {
    /// Create a preparer using the resolution from `config`.
    pub fn new(codec: C, config: &ConditionConfig) -> Self {
        Self::with_resolution(codec, config.resolution)
    }

    pub fn with_resolution(codec: C, resolution: u32) -> Self {
        Self { codec, resolution }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Prepare `image` at the default resolution.
    pub fn prepare(&self, image: C::Image) -> std::result::Result<C::Image, ConditionError> {
        prepare_condition_image(&self.codec, image, self.resolution)
    }

    /// Prepare `image` at an explicit resolution.
    pub fn prepare_at(
        &self,
        image: C::Image,
        resolution: u32,
    ) -> std::result::Result<C::Image, ConditionError> {
        prepare_condition_image(&self.codec, image, resolution)
    }

    /// Resize only, at the default resolution.
    pub fn resize(&self, image: C::Image) -> std::result::Result<C::Image, ConditionError> {
        resize_for_condition(&self.codec, image, self.resolution)
    }

    /// Decode `bytes`, prepare at the default resolution, encode as `format`.
    pub fn prepare_bytes(&self, bytes: &[u8], format: ImageFormat) -> Result<Vec<u8>> {
        let image = self.codec.decode(bytes)?;
        let prepared = self.prepare(image)?;
        Ok(self.codec.encode(&prepared, format)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::fake::{FakeCodec, FakeImage, FakeMode, RecordedOp};
    use crate::imaging::rust_codec::tests::encoded;
    use crate::imaging::{Orientation, OrientedImage};
    use image::{DynamicImage, GenericImageView};

    fn target(w: u32, h: u32, res: u32) -> (u32, u32) {
        let dims = condition_target(Dimensions::new(w, h), res).unwrap();
        (dims.width, dims.height)
    }

    #[test]
    fn test_landscape_example() {
        assert_eq!(target(1600, 900, 1024), (1822, 1024));
    }

    #[test]
    fn test_square_example() {
        assert_eq!(target(512, 512, 768), (768, 768));
    }

    #[test]
    fn test_portrait_uses_rounded_ratio() {
        // round(900 / 1600, 2) = 0.56; floor(1024 / 0.56) = 1828
        assert_eq!(target(900, 1600, 1024), (1024, 1828));
    }

    #[test]
    fn test_ratio_just_below_a_half_rounds_down() {
        // 1720 / 1600 is stored as 1.07499..., so ar = 1.07 and floor(1024 * 1.07) = 1095
        assert_eq!(target(1720, 1600, 1024), (1095, 1024));
        // 700 / 4000 rounds to 0.17; floor(1024 / 0.17) = 6023
        assert_eq!(target(700, 4000, 1024), (1024, 6023));
    }

    #[test]
    fn test_formulas_hold_across_shapes() {
        let sizes = [(640, 480), (480, 640), (1920, 1080), (1080, 1920), (333, 1000)];
        for (w, h) in sizes {
            for res in [256u32, 512, 1024] {
                let ar = round_ratio(w, h);
                let expected = if w > h {
                    ((f64::from(res) * ar).floor() as u32, res)
                } else {
                    (res, (f64::from(res) / ar).floor() as u32)
                };
                let expected = if expected.0 == expected.1 {
                    (res, res)
                } else {
                    expected
                };
                assert_eq!(target(w, h, res), expected, "{w}x{h} @ {res}");
            }
        }
    }

    fn round_ratio(w: u32, h: u32) -> f64 {
        crate::bucket::round_to(f64::from(w) / f64::from(h), 2)
    }

    #[test]
    fn test_scaled_sides_that_collide_become_square() {
        // floor(1 * 1.5) = 1 == resolution, so square normalization applies
        assert_eq!(target(300, 200, 1), (1, 1));
        // 1004 / 1000 rounds to 1.0
        assert_eq!(target(1004, 1000, 640), (640, 640));
    }

    #[test]
    fn test_target_equal_to_current() {
        assert_eq!(target(1822, 1024, 1024), (1822, 1024));
        assert_eq!(target(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            condition_target(Dimensions::new(10, 10), 0),
            Err(ConditionError::InvalidResolution)
        );
        assert_eq!(
            condition_target(Dimensions::new(10, 0), 64),
            Err(ConditionError::DegenerateAspectRatio {
                width: 10,
                height: 0
            })
        );
        // 1 / 1000 rounds to 0.0
        assert!(matches!(
            condition_target(Dimensions::new(1, 1000), 64),
            Err(ConditionError::DegenerateAspectRatio { .. })
        ));
        assert!(matches!(
            condition_target(Dimensions::new(100_000, 1), 100_000),
            Err(ConditionError::DegenerateTarget { .. })
        ));
    }

    #[test]
    fn test_resize_skips_resample_when_size_matches() {
        let codec = FakeCodec::new();
        let out = resize_for_condition(&codec, FakeImage::new(1024, 1024), 1024).unwrap();
        assert_eq!((out.width, out.height), (1024, 1024));
        assert_eq!(codec.get_operations(), vec![RecordedOp::ToRgb]);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let codec = FakeCodec::new();
        let once = resize_for_condition(&codec, FakeImage::new(1600, 900), 1024).unwrap();
        let twice = resize_for_condition(&codec, once.clone(), 1024).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            codec.get_operations(),
            vec![
                RecordedOp::ToRgb,
                RecordedOp::Resize(Dimensions::new(1822, 1024)),
                RecordedOp::ToRgb,
            ]
        );
    }

    #[test]
    fn test_prepare_normalizes_mode_and_orientation() {
        let codec = FakeCodec::new();
        let image = FakeImage::new(900, 1600)
            .with_mode(FakeMode::Rgba)
            .with_orientation(Orientation::Rotate90);

        let out = prepare_condition_image(&codec, image, 1024).unwrap();
        assert_eq!((out.width, out.height), (1822, 1024));
        assert_eq!(out.mode, FakeMode::Rgb);
        assert_eq!(out.orientation, Orientation::Normal);
        assert_eq!(
            codec.get_operations(),
            vec![
                RecordedOp::ToRgb,
                RecordedOp::Reorient,
                RecordedOp::ToRgb,
                RecordedOp::Resize(Dimensions::new(1822, 1024)),
            ]
        );
    }

    #[test]
    fn test_prepare_propagates_policy_errors() {
        let preparer = ConditionPreparer::with_resolution(FakeCodec::new(), 0);
        let err = preparer.prepare(FakeImage::new(10, 10)).unwrap_err();
        assert_eq!(err, ConditionError::InvalidResolution);
    }

    #[test]
    fn test_preparer_uses_config_resolution() {
        let preparer = ConditionPreparer::new(FakeCodec::new(), &ConditionConfig::default());
        assert_eq!(preparer.resolution(), 1024);
        let out = preparer.prepare(FakeImage::new(512, 512)).unwrap();
        assert_eq!((out.width, out.height), (1024, 1024));

        let out = preparer.prepare_at(FakeImage::new(512, 512), 768).unwrap();
        assert_eq!((out.width, out.height), (768, 768));

        let out = preparer.resize(FakeImage::new(900, 1600)).unwrap();
        assert_eq!((out.width, out.height), (1024, 1828));
    }

    #[test]
    fn test_prepare_real_rgba_image() {
        let codec = RustCodec::default();
        let image = OrientedImage::with_orientation(
            DynamicImage::new_rgba8(90, 160),
            Orientation::Rotate270,
        );
        let out = prepare_condition_image(&codec, image, 64).unwrap();
        // Upright 160x90, ratio 1.78, floor(64 * 1.78) = 113
        assert_eq!(out.image.dimensions(), (113, 64));
        assert!(matches!(out.image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_prepare_bytes_roundtrip() {
        let preparer = ConditionPreparer::with_resolution(RustCodec::default(), 16);
        let png = encoded(40, 20, ImageFormat::Png);
        let out = preparer.prepare_bytes(&png, ImageFormat::Png).unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[test]
    fn test_prepare_bytes_rejects_garbage() {
        let preparer = ConditionPreparer::with_resolution(RustCodec::default(), 16);
        let err = preparer
            .prepare_bytes(b"nope", ImageFormat::Png)
            .unwrap_err();
        assert!(matches!(err, crate::error::MultiaspectError::Codec(_)));
    }
}
