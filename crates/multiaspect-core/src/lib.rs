//! Multiaspect Core - aspect-ratio bucketing and condition-image preparation.
//!
//! Two independent, stateless operations over decoded images:
//!
//! - **Bucket assignment**: read an image through a [`Storage`], orient it,
//!   and file its path under its rounded width/height ratio in a caller-owned
//!   [`BucketIndex`]. Failures are reported (or logged and skipped), never
//!   propagated into the index.
//! - **Condition-image preparation**: convert to RGB, orient, and resize to a
//!   target resolution while preserving aspect ratio.
//!
//! ```text
//! Storage::read → decode → reorient → round(W/H) → BucketIndex[key].push(path)
//! image → to_rgb → reorient → condition_target → bicubic resize
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use multiaspect_core::{BucketAssigner, BucketIndex, Config, FsStorage, RustCodec};
//!
//! let config = Config::load()?;
//! let storage = FsStorage::new("./dataset", &config.limits);
//! let assigner = BucketAssigner::new(RustCodec::new(config.limits.clone()), &config.bucket);
//!
//! let mut index = BucketIndex::new();
//! for path in ["a.jpg", "b.png"] {
//!     assigner.assign(&storage, path, &mut index);
//! }
//! ```

// Module declarations
pub mod bucket;
pub mod condition;
pub mod config;
pub mod discovery;
pub mod error;
pub mod imaging;
pub mod output;
pub mod storage;
pub mod types;

// Re-exports for convenient access
pub use bucket::{assign_to_bucket, AspectKey, BucketAssigner, BucketIndex};
pub use condition::{
    condition_target, prepare_condition_image, resize_for_condition, ConditionPreparer,
};
pub use config::Config;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use error::{
    BucketFailure, CodecError, ConditionError, ConfigError, FailureKind, MultiaspectError,
    Result, StorageError,
};
pub use imaging::{Dimensions, ImageCodec, Orientation, OrientedImage, RustCodec};
pub use output::{OutputFormat, OutputWriter};
pub use storage::{FsStorage, MemoryStorage, Storage};
pub use types::AssignmentRecord;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bucket assigner and condition preparer built from one configuration.
pub struct Multiaspect {
    config: Config,
    assigner: BucketAssigner,
    preparer: ConditionPreparer,
}

impl Multiaspect {
    /// Build both operations over the production codec.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Multiaspect v{}", VERSION);
        let codec = RustCodec::new(config.limits.clone());
        Self {
            assigner: BucketAssigner::new(codec.clone(), &config.bucket),
            preparer: ConditionPreparer::new(codec, &config.condition),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn assigner(&self) -> &BucketAssigner {
        &self.assigner
    }

    pub fn preparer(&self) -> &ConditionPreparer {
        &self.preparer
    }

    /// Storage rooted at `root` honoring the configured limits.
    pub fn storage(&self, root: impl Into<std::path::PathBuf>) -> FsStorage {
        FsStorage::new(root, &self.config.limits)
    }
}
