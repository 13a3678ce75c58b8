//! Static column partitioning for parallel rendering.
//!
//! The image is cut into contiguous column ranges up front, one per worker,
//! so workers never touch the same pixel and need no locking.

use std::ops::Range;

/// Split `[0, width)` into contiguous column ranges of `ceil(width / workers)`
/// columns each; the last range takes the remainder.
///
/// Every column appears in exactly one range and no range is empty, so fewer
/// than `workers` ranges come back when the columns run out early.
pub fn column_chunks(width: u32, workers: usize) -> Vec<Range<u32>> {
    if width == 0 {
        return Vec::new();
    }
    let chunk = chunk_width(width, workers);

    (0..width)
        .step_by(chunk as usize)
        .map(|start| start..(start + chunk).min(width))
        .collect()
}

/// Columns per worker for an image `width` columns wide.
pub fn chunk_width(width: u32, workers: usize) -> u32 {
    let workers = u32::try_from(workers.max(1)).unwrap_or(u32::MAX);
    width.div_ceil(workers).max(1)
}
