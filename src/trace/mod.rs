//! Eager step-sequence generators
//!
//! Each generator is a pure function of its request: it validates the input,
//! runs the real algorithm, and records one [`Snapshot`] per observable event.
//! The same request always yields the same [`StepSequence`], which is what
//! makes scrubbing backward and forward stable.
//!
//! - [`matrix`]: row, column, snake, spiral and diagonal traversals
//! - [`prefix_sum`]: in-place prefix build and range-sum query
//! - [`kadane`]: maximum subarray scan
//! - [`segment_tree`]: build, range-sum query and point update
//! - [`mst`]: Kruskal's minimum spanning tree over a disjoint set
//! - [`trie`]: insert and search over a prefix tree
//!
//! Every non-empty sequence opens with an [`EventKind::Start`] snapshot and
//! closes with an [`EventKind::Done`] snapshot. Empty input produces exactly
//! one no-op snapshot.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot
//! [`EventKind::Start`]: crate::snapshot::EventKind::Start
//! [`EventKind::Done`]: crate::snapshot::EventKind::Done

pub mod kadane;
pub mod matrix;
pub mod mst;
pub mod prefix_sum;
pub mod segment_tree;
pub mod trie;

use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::StepSequence;

pub use kadane::Kadane;
pub use matrix::{MatrixOrder, MatrixTraversal};
pub use mst::{DisjointSet, Kruskal};
pub use prefix_sum::PrefixSum;
pub use segment_tree::{SegmentOp, SegmentTreeTrace};
pub use trie::{TrieOp, TrieTrace};

/// A request that can be expanded into a full step sequence
pub trait Generator {
    /// Short name shown in the UI header
    fn name(&self) -> &str;

    /// Validate the request and produce every snapshot
    fn generate(&self) -> TraceResult<StepSequence>;
}

fn sum_overflow(field: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        message: "sum overflows".to_string(),
    }
}

fn fits(sum: i128) -> bool {
    (i64::MIN as i128..=i64::MAX as i128).contains(&sum)
}

/// Reject input where some contiguous run sums outside `i64`.
///
/// Prefix sums, Kadane windows and segment tree nodes are all contiguous
/// runs, so the largest and smallest run sums bound every value they hold.
pub(crate) fn check_run_sums(field: &'static str, values: &[i64]) -> TraceResult<()> {
    let (mut high, mut low) = (0i128, 0i128);
    let (mut max_run, mut min_run) = (0i128, 0i128);
    for &v in values {
        let v = v as i128;
        high = (high + v).max(v);
        low = (low + v).min(v);
        max_run = max_run.max(high);
        min_run = min_run.min(low);
    }
    if fits(max_run) && fits(min_run) {
        Ok(())
    } else {
        Err(sum_overflow(field))
    }
}

/// Reject input where some subset sums outside `i64`
pub(crate) fn check_subset_sums(field: &'static str, values: &[i64]) -> TraceResult<()> {
    let positive: i128 = values.iter().filter(|&&v| v > 0).map(|&v| v as i128).sum();
    let negative: i128 = values.iter().filter(|&&v| v < 0).map(|&v| v as i128).sum();
    if fits(positive) && fits(negative) {
        Ok(())
    } else {
        Err(sum_overflow(field))
    }
}
