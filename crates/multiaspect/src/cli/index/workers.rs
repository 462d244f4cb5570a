//! Parallel bucketing: one accumulator per blocking worker, merged in order.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use multiaspect_core::{
    AssignmentRecord, BucketAssigner, BucketIndex, Config, DiscoveredFile, Multiaspect, Storage,
};

/// Merged result of an indexing pass.
#[derive(Debug, Default)]
pub struct IndexOutcome {
    pub index: BucketIndex,
    pub records: Vec<AssignmentRecord>,
}

impl IndexOutcome {
    pub fn bucketed(&self) -> usize {
        self.records.iter().filter(|r| r.is_bucketed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.records.len() - self.bucketed()
    }

    fn merge(&mut self, other: IndexOutcome) {
        self.index.merge(other.index);
        self.records.extend(other.records);
    }
}

/// Bucket `files` (keys relative to `root`) across the configured workers.
///
/// Files are split into contiguous chunks and merged back in chunk order, so
/// the output only depends on the file list and worker count.
pub async fn run(
    files: Vec<DiscoveredFile>,
    root: PathBuf,
    config: &Config,
    show_progress: bool,
) -> anyhow::Result<IndexOutcome> {
    let keys: Vec<String> = files.into_iter().map(|f| f.key).collect();
    let workers = config.processing.parallel_workers.clamp(1, keys.len().max(1));
    let chunk_size = keys.len().div_ceil(workers).max(1);

    let multiaspect = Arc::new(Multiaspect::new(config.clone()));
    let storage = Arc::new(multiaspect.storage(root));
    let progress = if show_progress {
        create_progress_bar(keys.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    tracing::debug!(
        "Indexing {} file(s) with {} worker(s), chunk size {}",
        keys.len(),
        workers,
        chunk_size
    );

    let handles: Vec<_> = keys
        .chunks(chunk_size)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            let storage = Arc::clone(&storage);
            let multiaspect = Arc::clone(&multiaspect);
            let progress = progress.clone();
            tokio::task::spawn_blocking(move || {
                index_chunk(multiaspect.assigner(), storage.as_ref(), &chunk, &progress)
            })
        })
        .collect();

    let mut outcome = IndexOutcome::default();
    for handle in handles {
        outcome.merge(handle.await?);
    }
    progress.finish_and_clear();
    Ok(outcome)
}

/// Bucket one chunk into a fresh accumulator.
///
/// Failures are logged here and recorded; they never stop the chunk.
pub fn index_chunk<S: Storage + ?Sized>(
    assigner: &BucketAssigner,
    storage: &S,
    keys: &[String],
    progress: &ProgressBar,
) -> IndexOutcome {
    let mut outcome = IndexOutcome::default();
    for key in keys {
        let result = assigner.try_assign(storage, key, &mut outcome.index);
        if let Err(failure) = &result {
            failure.log();
        }
        outcome
            .records
            .push(AssignmentRecord::from_result(key, &result));
        progress.inc(1);
    }
    outcome
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("bucketing...");
    pb
}
