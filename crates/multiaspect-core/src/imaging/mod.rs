//! Image codec capability.
//!
//! | Operation | Production ([`RustCodec`]) |
//! |---|---|
//! | **decode** | `image::ImageReader` with content sniffing |
//! | **orientation** | EXIF tag 0x0112 via `kamadak-exif` |
//! | **to_rgb** | `DynamicImage::to_rgb8` (alpha dropped) |
//! | **resize** | `resize_exact` with `CatmullRom` (bicubic) |
//! | **encode** | `DynamicImage::write_to` |
//!
//! Bucketing and condition-image preparation only talk to [`ImageCodec`], so
//! their policy can be tested against a fake handle with arbitrary
//! dimensions.

mod codec;
pub(crate) mod orientation;
pub mod rust_codec;

#[cfg(test)]
pub(crate) mod fake;

pub use codec::{Dimensions, ImageCodec};
pub use orientation::Orientation;
pub use rust_codec::{OrientedImage, RustCodec};
