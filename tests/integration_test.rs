// End-to-end scenarios for the precomputed traces and recorded sorts

use algoreplay::exec::{record, SortAlgorithm};
use algoreplay::playback::{PlaybackState, Player};
use algoreplay::snapshot::{ElementStatus, EventKind};
use algoreplay::trace::segment_tree::layout;
use algoreplay::trace::{
    Generator, Kadane, Kruskal, MatrixOrder, MatrixTraversal, SegmentOp, SegmentTreeTrace, TrieOp,
    TrieTrace,
};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_bubble_sort_recording_ends_sorted() {
    let seq = record(&SortAlgorithm::Bubble, &[5, 3, 8, 1])
        .await
        .expect("Recording failed");

    let last = seq.last();
    assert_eq!(last.values(), vec![1, 3, 5, 8]);
    assert!(last.statuses().iter().all(|&s| s == ElementStatus::Sorted));
    assert_eq!(last.event.kind, EventKind::Done);
    assert_eq!(seq.first().event.kind, EventKind::Start);

    // every snapshot keeps the same multiset of values
    for snapshot in &seq {
        let mut values = snapshot.values();
        values.sort();
        assert_eq!(values, vec![1, 3, 5, 8]);
    }
}

#[test]
fn test_row_major_traversal_order() {
    let matrix = vec![vec![1, 2, 3], vec![4, 5, 6]];
    let seq = MatrixTraversal::new(matrix, MatrixOrder::Row)
        .generate()
        .expect("Generation failed");

    let visits: Vec<(String, String)> = seq
        .iter()
        .filter(|s| s.event.kind == EventKind::Visit)
        .map(|s| {
            (
                s.variable("row").unwrap_or_default().to_string(),
                s.variable("col").unwrap_or_default().to_string(),
            )
        })
        .collect();
    let expected: Vec<(String, String)> = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        .iter()
        .map(|(r, c)| (r.to_string(), c.to_string()))
        .collect();
    assert_eq!(visits, expected);
    assert_eq!(seq.last().variable("visited"), Some("6"));
}

#[test]
fn test_kadane_classic_input() {
    let seq = Kadane::new(vec![-2, 1, -3, 4, -1, 2, 1, -5, 4])
        .generate()
        .expect("Generation failed");

    let last = seq.last();
    assert_eq!(last.variable("maxSoFar"), Some("6"));
    assert_eq!(last.variable("start"), Some("3"));
    assert_eq!(last.variable("end"), Some("6"));
    for (i, status) in last.statuses().into_iter().enumerate() {
        let expected = if (3..=6).contains(&i) {
            ElementStatus::Found
        } else {
            ElementStatus::Default
        };
        assert_eq!(status, expected, "index {}", i);
    }
}

#[test]
fn test_segment_tree_query_marks_nodes_by_overlap() {
    let values = vec![1, 3, 5, 7, 9, 11];
    let (left, right) = (1, 4);
    let seq = SegmentTreeTrace::new(values.clone(), SegmentOp::Query { left, right })
        .generate()
        .expect("Generation failed");
    assert_eq!(seq.last().variable("sum"), Some("24"));

    let ranges = layout(values.len());
    assert_eq!(ranges.len(), 2 * values.len() - 1);
    for snapshot in &seq {
        for (node, status) in snapshot.statuses().into_iter().enumerate() {
            let (lo, hi) = ranges[node];
            let overlaps = hi >= left && lo <= right;
            match status {
                ElementStatus::Visiting => assert!(overlaps, "node {} [{}, {}]", node, lo, hi),
                ElementStatus::Found => {
                    assert!(left <= lo && hi <= right, "node {} [{}, {}]", node, lo, hi)
                }
                ElementStatus::OutOfBounds => assert!(!overlaps, "node {} [{}, {}]", node, lo, hi),
                _ => {}
            }
        }
    }

    // [0,5] [0,2] [0,1] [0,0] [1,1] [2,2] [3,5] [3,4] [3,3] [4,4] [5,5]
    let statuses = seq.last().statuses();
    let nodes_with = |wanted: ElementStatus| -> Vec<usize> {
        statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| **status == wanted)
            .map(|(node, _)| node)
            .collect()
    };
    assert_eq!(nodes_with(ElementStatus::Visiting), vec![0, 1, 2, 6]);
    assert_eq!(nodes_with(ElementStatus::Found), vec![4, 5, 7]);
    assert_eq!(nodes_with(ElementStatus::OutOfBounds), vec![3, 10]);
    assert_eq!(nodes_with(ElementStatus::Default), vec![8, 9]);
}

#[test]
fn test_segment_tree_update_changes_root() {
    let seq = SegmentTreeTrace::new(vec![1, 3, 5, 7], SegmentOp::Update { index: 2, value: 10 })
        .generate()
        .expect("Generation failed");
    assert_eq!(seq.last().values()[0], 1 + 3 + 10 + 7);
}

#[test]
fn test_kruskal_total_weight() {
    let edges = vec![(0, 1, 4), (0, 2, 1), (1, 2, 2), (1, 3, 5), (2, 3, 8)];
    let seq = Kruskal::new(4, edges).generate().expect("Generation failed");
    assert_eq!(seq.last().variable("totalWeight"), Some("8"));
    assert_eq!(seq.last().variable("edgesAccepted"), Some("3"));
}

#[test]
fn test_trie_prefix_is_not_a_word() {
    let words = vec!["card".to_string(), "care".to_string()];
    let seq = TrieTrace::new(words.clone(), TrieOp::Search("car".to_string()))
        .generate()
        .expect("Generation failed");
    assert_eq!(seq.last().variable("found"), Some("false"));

    let seq = TrieTrace::new(words, TrieOp::Search("care".to_string()))
        .generate()
        .expect("Generation failed");
    assert_eq!(seq.last().variable("found"), Some("true"));
}

#[test]
fn test_validation_happens_before_any_step() {
    let err = SegmentTreeTrace::new(vec![1, 2, 3], SegmentOp::Query { left: 2, right: 1 })
        .generate()
        .err()
        .expect("Inverted range accepted");
    assert!(err.to_string().contains("query"));

    let ragged = MatrixTraversal::new(vec![vec![1, 2], vec![3]], MatrixOrder::Spiral).generate();
    assert!(ragged.is_err());
}

#[test]
fn test_player_scrubs_within_bounds() {
    let seq = Kadane::new(vec![2, -1, 3]).generate().expect("Generation failed");
    let len = seq.len();
    let mut player = Player::new(Duration::from_millis(10));
    player.load(seq);

    assert!(!player.step_backward());
    assert_eq!(player.index(), -1);
    for _ in 0..len + 3 {
        player.step_forward();
    }
    assert_eq!(player.index(), len as isize - 1);
    assert!((player.progress_percent() - 100.0).abs() < f64::EPSILON);

    // auto-play from the start reaches Completed and stops there
    player.jump_to_start();
    player.start();
    assert_eq!(player.state(), PlaybackState::Running);
    let mut now = Instant::now();
    for _ in 0..len * 2 {
        player.tick(now);
        now += Duration::from_millis(10);
    }
    assert_eq!(player.state(), PlaybackState::Completed);
    assert_eq!(player.index(), len as isize - 1);
}
