//! Aspect-ratio rounding and bucket keys.

use std::fmt;

use crate::imaging::Dimensions;

/// Default number of decimal digits kept in a bucket key.
pub const DEFAULT_ROUNDING: u32 = 2;

/// Largest rounding precision accepted by configuration.
pub const MAX_ROUNDING: u32 = 15;

/// Round `value` to `digits` decimal places.
///
/// Rounds the exact binary value of `value`, so `1.075` (stored just below
/// the half) becomes `1.07`. Scaling by `10^digits` first would land on an
/// exact `.5` and round the other way.
pub fn round_to(value: f64, digits: u32) -> f64 {
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}

/// `width / height` rounded to `digits`, or `None` for a zero height.
pub fn aspect_ratio(dims: Dimensions, digits: u32) -> Option<f64> {
    if dims.height == 0 {
        return None;
    }
    Some(round_to(
        f64::from(dims.width) / f64::from(dims.height),
        digits,
    ))
}

/// A rounded aspect ratio and the string it is bucketed under.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectKey {
    ratio: f64,
    key: String,
}

impl AspectKey {
    /// Round `ratio` to `digits` and format it as a key.
    pub fn from_ratio(ratio: f64, digits: u32) -> Self {
        let ratio = round_to(ratio, digits);
        Self {
            ratio,
            key: format_key(ratio),
        }
    }

    /// Key for an image of the given size; `None` for a zero height.
    pub fn from_dimensions(dims: Dimensions, digits: u32) -> Option<Self> {
        let ratio = aspect_ratio(dims, digits)?;
        Some(Self {
            ratio,
            key: format_key(ratio),
        })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for AspectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for AspectKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

impl From<AspectKey> for String {
    fn from(key: AspectKey) -> Self {
        key.key
    }
}

/// Shortest round-trip decimal, always with a fractional part (`1.0`, not `1`).
fn format_key(ratio: f64) -> String {
    let s = ratio.to_string();
    if !ratio.is_finite() || s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}
