//! Kruskal's minimum spanning tree

use super::{check_subset_sums, Generator};
use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::{
    elements_from, empty_sequence, ElementStatus, EventKind, Narrative, StepSequence,
    TraceRecorder,
};

/// Union-find with path compression and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`; false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Weighted undirected edge `(u, v, weight)`
pub type Edge = (usize, usize, i64);

#[derive(Debug, Clone)]
pub struct Kruskal {
    pub vertices: usize,
    pub edges: Vec<Edge>,
}

impl Kruskal {
    pub fn new(vertices: usize, edges: Vec<Edge>) -> Self {
        Kruskal { vertices, edges }
    }

    fn validate(&self) -> TraceResult<()> {
        let weights: Vec<i64> = self.edges.iter().map(|&(_, _, w)| w).collect();
        check_subset_sums("edges", &weights)?;
        for &(u, v, _) in &self.edges {
            for endpoint in [u, v] {
                if endpoint >= self.vertices {
                    return Err(ValidationError::IndexOutOfBounds {
                        field: "edges",
                        index: endpoint,
                        len: self.vertices,
                    });
                }
            }
        }
        Ok(())
    }

    /// Edges in the order Kruskal considers them
    pub fn sorted_edges(&self) -> Vec<Edge> {
        let mut edges = self.edges.clone();
        edges.sort_by_key(|&(u, v, w)| (w, u, v));
        edges
    }
}

impl Generator for Kruskal {
    fn name(&self) -> &str {
        "kruskal"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        self.validate()?;
        if self.edges.is_empty() {
            return Ok(empty_sequence("edge list"));
        }

        let edges = self.sorted_edges();
        let weights: Vec<i64> = edges.iter().map(|&(_, _, w)| w).collect();
        let mut rec = TraceRecorder::new(elements_from(&weights));
        rec.emit(
            EventKind::Start,
            Vec::new(),
            Narrative::new(
                "Start",
                format!(
                    "{} edges sorted by weight over {} vertices.",
                    edges.len(),
                    self.vertices
                ),
            ),
        );

        let mut sets = DisjointSet::new(self.vertices);
        let mut total = 0i64;
        let mut accepted = 0usize;
        let needed = self.vertices.saturating_sub(1);

        for (i, &(u, v, w)) in edges.iter().enumerate() {
            if accepted == needed {
                break;
            }
            rec.mark(i, ElementStatus::Comparing);
            rec.emit(
                EventKind::Compare,
                vec![i],
                Narrative::new(
                    format!("Consider {}-{}", u, v),
                    format!("Edge {}-{} has weight {}.", u, v, w),
                )
                .var("u", u)
                .var("v", v)
                .var("weight", w)
                .var("totalWeight", total),
            );

            if sets.union(u, v) {
                total += w;
                accepted += 1;
                rec.mark(i, ElementStatus::Found);
                rec.emit(
                    EventKind::Accept,
                    vec![i],
                    Narrative::new(
                        format!("Accept {}-{}", u, v),
                        format!("{} and {} were in different components.", u, v),
                    )
                    .var("totalWeight", total)
                    .var("edgesAccepted", accepted),
                );
            } else {
                rec.mark(i, ElementStatus::NotFound);
                rec.emit(
                    EventKind::Reject,
                    vec![i],
                    Narrative::new(
                        format!("Reject {}-{}", u, v),
                        format!("{} and {} are already connected; this edge closes a cycle.", u, v),
                    )
                    .var("totalWeight", total)
                    .var("edgesAccepted", accepted),
                );
            }
        }

        let explanation = if accepted == needed {
            format!("Spanning tree complete with weight {}.", total)
        } else {
            format!(
                "Graph is disconnected; forest of {} edges with weight {}.",
                accepted, total
            )
        };
        rec.emit(
            EventKind::Done,
            Vec::new(),
            Narrative::new("Done", explanation)
                .var("totalWeight", total)
                .var("edgesAccepted", accepted),
        );
        Ok(rec.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_set_union() {
        let mut ds = DisjointSet::new(4);
        assert!(ds.union(0, 1));
        assert!(ds.union(2, 3));
        assert!(!ds.union(1, 0));
        assert!(ds.union(1, 3));
        assert_eq!(ds.find(0), ds.find(2));
    }

    #[test]
    fn test_square_with_diagonal() {
        // 0-1 (1), 1-2 (2), 2-3 (3), 3-0 (4), 0-2 (5)
        let mst = Kruskal::new(4, vec![(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4), (0, 2, 5)]);
        let seq = mst.generate().unwrap();
        let last = seq.last();
        assert_eq!(last.variable("totalWeight"), Some("6"));
        assert_eq!(last.count(ElementStatus::Found), 3);
        // stops once three edges are accepted
        assert_eq!(last.count(ElementStatus::Default), 2);
    }

    #[test]
    fn test_cycle_edge_rejected() {
        let mst = Kruskal::new(3, vec![(0, 1, 1), (1, 0, 2), (1, 2, 3)]);
        let seq = mst.generate().unwrap();
        assert_eq!(seq.last().statuses()[1], ElementStatus::NotFound);
        assert!(seq.iter().any(|s| s.event.kind == EventKind::Reject));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let err = Kruskal::new(2, vec![(0, 2, 1)]).generate();
        assert!(matches!(
            err,
            Err(ValidationError::IndexOutOfBounds { field: "edges", index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let edges = vec![(0, 1, i64::MAX), (1, 2, 1)];
        let err = Kruskal::new(3, edges).generate();
        assert!(matches!(
            err,
            Err(ValidationError::InvalidValue { field: "edges", .. })
        ));
        let edges = vec![(0, 1, i64::MAX), (1, 2, -1)];
        assert!(Kruskal::new(3, edges).generate().is_ok());
    }
}
