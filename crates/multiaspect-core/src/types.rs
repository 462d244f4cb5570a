//! Per-image records emitted by an indexing pass.

use serde::{Deserialize, Serialize};

use crate::bucket::AspectKey;
use crate::error::{BucketFailure, FailureKind};

/// Outcome of bucketing one image, as written to JSONL output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssignmentRecord {
    /// The image was filed under `bucket`
    Bucketed { path: String, bucket: String },

    /// The image was left out of the index
    Skipped {
        path: String,
        kind: FailureKind,
        error: String,
    },
}

impl AssignmentRecord {
    pub fn path(&self) -> &str {
        match self {
            Self::Bucketed { path, .. } | Self::Skipped { path, .. } => path,
        }
    }

    pub fn is_bucketed(&self) -> bool {
        matches!(self, Self::Bucketed { .. })
    }

    /// Build a record from the result of `BucketAssigner::try_assign`.
    pub fn from_result(path: &str, result: &Result<AspectKey, BucketFailure>) -> Self {
        match result {
            Ok(key) => Self::Bucketed {
                path: path.to_string(),
                bucket: key.to_string(),
            },
            Err(failure) => Self::Skipped {
                path: failure.path.clone(),
                kind: failure.kind,
                error: failure.message.clone(),
            },
        }
    }
}
