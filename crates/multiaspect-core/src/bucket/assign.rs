//! Per-image bucket assignment.

use crate::config::BucketConfig;
use crate::error::BucketFailure;
use crate::imaging::{Dimensions, ImageCodec, RustCodec};
use crate::storage::Storage;

use super::index::BucketIndex;
use super::ratio::{AspectKey, MAX_ROUNDING};

/// Reads, decodes, orients and measures one image, then files its path under
/// the rounded aspect ratio.
///
/// Holds no state between calls; the index is owned by the caller.
#[derive(Debug, Clone)]
pub struct BucketAssigner<C = RustCodec> {
    codec: C,
    rounding: u32,
}

impl<C: ImageCodec> BucketAssigner<C> {
    /// Create an assigner using the rounding from `config`.
    pub fn new(codec: C, config: &BucketConfig) -> Self {
        Self::with_rounding(codec, config.rounding)
    }

    /// Create an assigner keeping `rounding` decimal digits.
    pub fn with_rounding(codec: C, rounding: u32) -> Self {
        Self {
            codec,
            rounding: rounding.min(MAX_ROUNDING),
        }
    }

    pub fn rounding(&self) -> u32 {
        self.rounding
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Compute the bucket key and upright size for `path` without touching
    /// any index.
    pub fn measure<S: Storage + ?Sized>(
        &self,
        storage: &S,
        path: &str,
    ) -> Result<(AspectKey, Dimensions), BucketFailure> {
        let bytes = storage
            .read(path)
            .map_err(|e| BucketFailure::retrieval(path, &e))?;
        let image = self
            .codec
            .decode(&bytes)
            .map_err(|e| BucketFailure::decode(path, e.to_string()))?;
        let image = self.codec.reorient(image);
        let dims = self.codec.dimensions(&image);

        let key = AspectKey::from_dimensions(dims, self.rounding).ok_or_else(|| {
            BucketFailure::decode(path, format!("image has zero height ({dims})"))
        })?;
        Ok((key, dims))
    }

    /// Bucket `path` into `index`, reporting failure to the caller.
    ///
    /// On error the index is left exactly as it was. Nothing is logged.
    pub fn try_assign<S: Storage + ?Sized>(
        &self,
        storage: &S,
        path: &str,
        index: &mut BucketIndex,
    ) -> Result<AspectKey, BucketFailure> {
        let (key, dims) = self.measure(storage, path)?;
        tracing::debug!(
            "Image {} has aspect ratio {} and size {}.",
            path,
            key,
            dims
        );
        index.insert(key.as_str(), path);
        Ok(key)
    }

    /// Bucket `path` into `index`, logging and skipping failures.
    ///
    /// Never fails: a corrupt or missing image is logged at error level and
    /// leaves the index untouched, so one bad file cannot abort a bulk pass.
    /// Returns the same index for chaining.
    pub fn assign<'a, S: Storage + ?Sized>(
        &self,
        storage: &S,
        path: &str,
        index: &'a mut BucketIndex,
    ) -> &'a mut BucketIndex {
        if let Err(failure) = self.try_assign(storage, path, index) {
            failure.log();
        }
        index
    }
}

/// Bucket one image with the production codec and the given rounding.
pub fn assign_to_bucket<'a, S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    index: &'a mut BucketIndex,
    rounding: u32,
) -> &'a mut BucketIndex {
    BucketAssigner::with_rounding(RustCodec::default(), rounding).assign(storage, path, index)
}
