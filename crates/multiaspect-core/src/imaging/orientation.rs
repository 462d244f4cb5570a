//! EXIF orientation (tag 0x0112) reading and application.

use exif::{In, Reader, Tag};
use image::DynamicImage;
use std::io::Cursor;

/// The eight EXIF orientations, named by the transform that displays the
/// stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// 1: stored upright
    #[default]
    Normal,
    /// 2: mirrored horizontally
    FlipHorizontal,
    /// 3: rotated 180°
    Rotate180,
    /// 4: mirrored vertically
    FlipVertical,
    /// 5: mirrored across the main diagonal
    Transpose,
    /// 6: needs 90° clockwise rotation
    Rotate90,
    /// 7: mirrored across the anti-diagonal
    Transverse,
    /// 8: needs 270° clockwise rotation
    Rotate270,
}

impl Orientation {
    /// Map an EXIF orientation value. Values outside 1..=8 are treated as
    /// upright.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// The EXIF tag value for this orientation.
    pub fn to_exif(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
        }
    }

    /// Read the orientation embedded in encoded image bytes.
    ///
    /// Missing or unparseable EXIF yields [`Orientation::Normal`].
    pub fn read_from_bytes(bytes: &[u8]) -> Self {
        let mut cursor = Cursor::new(bytes);
        let exif = match Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(_) => return Self::Normal,
        };

        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .map(Self::from_exif)
            .unwrap_or_default()
    }

    /// Whether applying this orientation exchanges width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    /// Transform `image` so it displays upright.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => image,
            Self::FlipHorizontal => image.fliph(),
            Self::Rotate180 => image.rotate180(),
            Self::FlipVertical => image.flipv(),
            Self::Transpose => image.rotate90().fliph(),
            Self::Rotate90 => image.rotate90(),
            Self::Transverse => image.rotate270().fliph(),
            Self::Rotate270 => image.rotate270(),
        }
    }
}
