//! Sorting-family algorithm bodies

use super::{Algorithm, Executor, Flow, RunFuture};
use crate::errors::ValidationError;
use crate::snapshot::ElementStatus;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
    Heap,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 6] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
        SortAlgorithm::Heap,
    ];

    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.id() == name)
            .ok_or_else(|| ValidationError::UnknownName {
                field: "algorithm",
                name: name.to_string(),
            })
    }

    /// Short identifier used on the command line
    pub fn id(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Heap => "heap",
        }
    }
}

impl Algorithm for SortAlgorithm {
    fn name(&self) -> &str {
        match self {
            SortAlgorithm::Bubble => "Bubble Sort",
            SortAlgorithm::Selection => "Selection Sort",
            SortAlgorithm::Insertion => "Insertion Sort",
            SortAlgorithm::Quick => "Quick Sort",
            SortAlgorithm::Merge => "Merge Sort",
            SortAlgorithm::Heap => "Heap Sort",
        }
    }

    fn run<'a>(&'a self, ex: &'a mut Executor) -> RunFuture<'a> {
        match self {
            SortAlgorithm::Bubble => Box::pin(bubble(ex)),
            SortAlgorithm::Selection => Box::pin(selection(ex)),
            SortAlgorithm::Insertion => Box::pin(insertion(ex)),
            SortAlgorithm::Quick => Box::pin(quick(ex)),
            SortAlgorithm::Merge => Box::pin(merge(ex)),
            SortAlgorithm::Heap => Box::pin(heap(ex)),
        }
    }
}

async fn bubble(ex: &mut Executor) -> Flow {
    let n = ex.len();
    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            if ex.compare(j, j + 1).await? == Ordering::Greater {
                ex.swap(j, j + 1).await?;
                swapped = true;
            }
        }
        ex.settle(n - 1 - pass);
        // no swaps means the prefix is already in order
        if !swapped {
            break;
        }
    }
    Ok(())
}

async fn selection(ex: &mut Executor) -> Flow {
    let n = ex.len();
    for i in 0..n {
        let mut min = i;
        ex.mark(min, ElementStatus::Pivot);
        for j in i + 1..n {
            if ex.compare(j, min).await? == Ordering::Less {
                ex.mark(min, ElementStatus::Default);
                min = j;
                ex.mark(min, ElementStatus::Pivot);
            }
        }
        if min != i {
            ex.swap(i, min).await?;
        }
        ex.mark(min, ElementStatus::Default);
        ex.settle(i);
    }
    Ok(())
}

async fn insertion(ex: &mut Executor) -> Flow {
    for i in 1..ex.len() {
        let mut j = i;
        while j > 0 && ex.compare(j - 1, j).await? == Ordering::Greater {
            ex.swap(j - 1, j).await?;
            j -= 1;
        }
    }
    Ok(())
}

/// Lomuto partitioning over an explicit range stack
async fn quick(ex: &mut Executor) -> Flow {
    let mut ranges = Vec::new();
    if ex.len() > 1 {
        ranges.push((0, ex.len() - 1));
    } else if ex.len() == 1 {
        ex.settle(0);
    }

    while let Some((lo, hi)) = ranges.pop() {
        if lo == hi {
            ex.settle(lo);
            continue;
        }

        ex.mark(hi, ElementStatus::Pivot);
        let mut store = lo;
        for j in lo..hi {
            if ex.compare(j, hi).await? == Ordering::Less {
                if store != j {
                    ex.swap(store, j).await?;
                }
                store += 1;
            }
        }
        if store != hi {
            ex.swap(store, hi).await?;
        }
        ex.mark(hi, ElementStatus::Default);
        ex.settle(store);

        if store < hi {
            ranges.push((store + 1, hi));
        }
        if store > lo {
            ranges.push((lo, store - 1));
        }
    }
    Ok(())
}

/// Bottom-up merge sort; every placement is a write
async fn merge(ex: &mut Executor) -> Flow {
    let n = ex.len();
    let mut width = 1;
    while width < n {
        let mut lo = 0;
        while lo + width < n {
            let mid = lo + width;
            let hi = (lo + 2 * width).min(n);
            merge_runs(ex, lo, mid, hi).await?;
            lo += 2 * width;
        }
        width *= 2;
    }
    Ok(())
}

async fn merge_runs(ex: &mut Executor, lo: usize, mid: usize, hi: usize) -> Flow {
    let left = (lo..mid).map(|k| ex.value(k)).collect::<Result<Vec<_>, _>>()?;
    let right = (mid..hi).map(|k| ex.value(k)).collect::<Result<Vec<_>, _>>()?;

    let (mut a, mut b, mut k) = (0, 0, lo);
    while a < left.len() && b < right.len() {
        // the left run's home may already be overwritten, so highlight the
        // write target against the right cursor
        let ordering = ex
            .compare_values((k, left[a]), (mid + b, right[b]))
            .await?;
        if ordering != Ordering::Greater {
            ex.write(k, left[a]).await?;
            a += 1;
        } else {
            ex.write(k, right[b]).await?;
            b += 1;
        }
        k += 1;
    }
    for &value in left[a..].iter().chain(&right[b..]) {
        ex.write(k, value).await?;
        k += 1;
    }
    Ok(())
}

async fn heap(ex: &mut Executor) -> Flow {
    let n = ex.len();
    for root in (0..n / 2).rev() {
        sift_down(ex, root, n).await?;
    }
    for end in (1..n).rev() {
        ex.swap(0, end).await?;
        ex.settle(end);
        sift_down(ex, 0, end).await?;
    }
    Ok(())
}

async fn sift_down(ex: &mut Executor, mut root: usize, end: usize) -> Flow {
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return Ok(());
        }
        let mut child = left;
        if left + 1 < end && ex.compare(left + 1, left).await? == Ordering::Greater {
            child = left + 1;
        }
        if ex.compare(child, root).await? != Ordering::Greater {
            return Ok(());
        }
        ex.swap(root, child).await?;
        root = child;
    }
}
