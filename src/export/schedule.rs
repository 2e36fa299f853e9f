//! Static interleaved partitioning of output frames across workers.
//!
//! Worker `i` of `n` owns indices `i, i + n, i + 2n, ...`. Assignment is fixed up front and
//! assumes roughly uniform per-frame cost; it does not rebalance when some frames are much
//! slower than others.

use std::{iter::StepBy, num::NonZeroUsize, ops::Range};

/// Resolve a requested worker count; `0` means the available hardware parallelism.
pub fn resolve_worker_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Cap a resolved worker count at the number of output frames and at rayon's pool limit.
pub fn clamp_worker_count(workers: usize, output_frames: u64) -> usize {
    let frames = usize::try_from(output_frames).unwrap_or(usize::MAX);
    workers.min(frames).min(rayon::max_num_threads()).max(1)
}

/// Output indices assigned to `worker` out of `workers`, for `total` output frames.
pub fn worker_indices(worker: usize, workers: usize, total: u64) -> StepBy<Range<u64>> {
    (worker as u64..total).step_by(workers.max(1))
}

/// Number of indices [`worker_indices`] yields.
pub fn worker_share(worker: usize, workers: usize, total: u64) -> u64 {
    let workers = workers.max(1) as u64;
    let worker = worker as u64;
    if worker >= total {
        0
    } else {
        (total - worker).div_ceil(workers)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/schedule.rs"]
mod tests;
