//! Segment tree build, range-sum query and point update
//!
//! Nodes live in a compact arena of `2n - 1` entries allocated in pre-order
//! (root at 0, then the whole left subtree, then the right subtree). The
//! snapshot elements are the node sums in arena order.

use super::{check_run_sums, Generator};
use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::{
    Element, ElementStatus, EventKind, Narrative, StepSequence, TraceRecorder, empty_sequence,
};

#[derive(Debug, Clone, Copy)]
struct Node {
    lo: usize,
    hi: usize,
    sum: i64,
    children: Option<(usize, usize)>,
}

/// Allocate the arena and fill in the sums
fn build_arena(values: &[i64]) -> Vec<Node> {
    fn alloc(nodes: &mut Vec<Node>, values: &[i64], lo: usize, hi: usize) -> usize {
        let id = nodes.len();
        nodes.push(Node {
            lo,
            hi,
            sum: 0,
            children: None,
        });
        if lo == hi {
            nodes[id].sum = values[lo];
        } else {
            let mid = lo + (hi - lo) / 2;
            let left = alloc(nodes, values, lo, mid);
            let right = alloc(nodes, values, mid + 1, hi);
            nodes[id].children = Some((left, right));
            nodes[id].sum = nodes[left].sum + nodes[right].sum;
        }
        id
    }

    let mut nodes = Vec::with_capacity(2 * values.len());
    if !values.is_empty() {
        alloc(&mut nodes, values, 0, values.len() - 1);
    }
    nodes
}

/// Inclusive index range covered by each arena node, in arena order
pub fn layout(len: usize) -> Vec<(usize, usize)> {
    build_arena(&vec![0; len])
        .iter()
        .map(|node| (node.lo, node.hi))
        .collect()
}

/// Operation traced on the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOp {
    Build,
    Query { left: usize, right: usize },
    Update { index: usize, value: i64 },
}

#[derive(Debug, Clone)]
pub struct SegmentTreeTrace {
    pub values: Vec<i64>,
    pub op: SegmentOp,
}

impl SegmentTreeTrace {
    pub fn new(values: Vec<i64>, op: SegmentOp) -> Self {
        SegmentTreeTrace { values, op }
    }

    fn validate(&self) -> TraceResult<()> {
        let len = self.values.len();
        check_run_sums("values", &self.values)?;
        match self.op {
            SegmentOp::Build => Ok(()),
            SegmentOp::Query { left, right } => {
                if left > right {
                    return Err(ValidationError::InvertedRange {
                        field: "query",
                        left,
                        right,
                    });
                }
                if right >= len {
                    return Err(ValidationError::IndexOutOfBounds {
                        field: "query.right",
                        index: right,
                        len,
                    });
                }
                Ok(())
            }
            SegmentOp::Update { index, value } => {
                if index >= len {
                    return Err(ValidationError::IndexOutOfBounds {
                        field: "update.index",
                        index,
                        len,
                    });
                }
                let mut updated = self.values.clone();
                updated[index] = value;
                check_run_sums("update.value", &updated)
            }
        }
    }
}

/// Working state for one traced operation
struct Tracer {
    nodes: Vec<Node>,
    rec: TraceRecorder,
}

impl Tracer {
    fn node_narrative(&self, id: usize, operation: &str, explanation: String) -> Narrative {
        let node = self.nodes[id];
        Narrative::new(operation, explanation)
            .var("node", id)
            .var("range", format!("[{}, {}]", node.lo, node.hi))
            .var("sum", node.sum)
    }

    fn build(&mut self, id: usize) {
        if let Some((left, right)) = self.nodes[id].children {
            self.build(left);
            self.build(right);
        }
        let node = self.nodes[id];
        self.rec.elements[id].value = node.sum;
        self.rec.mark(id, ElementStatus::Modified);
        let explanation = match node.children {
            None => format!("Leaf [{}] takes a[{}] = {}.", node.lo, node.lo, node.sum),
            Some((l, r)) => format!(
                "[{}, {}] = {} + {} = {}.",
                node.lo, node.hi, self.nodes[l].sum, self.nodes[r].sum, node.sum
            ),
        };
        let narrative = self.node_narrative(id, "Build node", explanation);
        self.rec.emit(EventKind::Update, vec![id], narrative);
    }

    fn query(&mut self, id: usize, left: usize, right: usize) -> i64 {
        let node = self.nodes[id];
        if node.hi < left || node.lo > right {
            self.rec.mark(id, ElementStatus::OutOfBounds);
            let narrative = self.node_narrative(
                id,
                "Skip node",
                format!(
                    "[{}, {}] lies outside [{}, {}].",
                    node.lo, node.hi, left, right
                ),
            );
            self.rec.emit(EventKind::Reject, vec![id], narrative);
            return 0;
        }
        if left <= node.lo && node.hi <= right {
            self.rec.mark(id, ElementStatus::Found);
            let narrative = self.node_narrative(
                id,
                "Take node",
                format!(
                    "[{}, {}] is inside [{}, {}], contributes {}.",
                    node.lo, node.hi, left, right, node.sum
                ),
            );
            self.rec.emit(EventKind::Accept, vec![id], narrative);
            return node.sum;
        }

        self.rec.mark(id, ElementStatus::Visiting);
        let narrative = self.node_narrative(
            id,
            "Split node",
            format!(
                "[{}, {}] partially overlaps [{}, {}], descend.",
                node.lo, node.hi, left, right
            ),
        );
        self.rec.emit(EventKind::Visit, vec![id], narrative);

        match node.children {
            Some((l, r)) => self.query(l, left, right) + self.query(r, left, right),
            // a leaf is always either inside or outside
            None => 0,
        }
    }

    fn update(&mut self, id: usize, index: usize, value: i64) {
        let node = self.nodes[id];
        match node.children {
            None => {
                self.nodes[id].sum = value;
            }
            Some((l, r)) => {
                self.rec.mark(id, ElementStatus::Visiting);
                let narrative = self.node_narrative(
                    id,
                    "Descend",
                    format!("Index {} lies in [{}, {}].", index, node.lo, node.hi),
                );
                self.rec.emit(EventKind::Visit, vec![id], narrative);

                if index <= self.nodes[l].hi {
                    self.update(l, index, value);
                } else {
                    self.update(r, index, value);
                }
                self.nodes[id].sum = self.nodes[l].sum + self.nodes[r].sum;
            }
        }

        self.rec.elements[id].value = self.nodes[id].sum;
        self.rec.mark(id, ElementStatus::Modified);
        let explanation = if node.children.is_none() {
            format!("Set leaf [{}] to {}.", index, value)
        } else {
            format!("Recompute [{}, {}] = {}.", node.lo, node.hi, self.nodes[id].sum)
        };
        let narrative = self.node_narrative(id, "Update node", explanation);
        self.rec.emit(EventKind::Update, vec![id], narrative);
    }
}

impl Generator for SegmentTreeTrace {
    fn name(&self) -> &str {
        "segment tree"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        self.validate()?;
        if self.values.is_empty() {
            return Ok(empty_sequence("segment tree"));
        }

        let nodes = build_arena(&self.values);
        let initial: Vec<Element> = match self.op {
            SegmentOp::Build => nodes.iter().map(|_| Element::new(0)).collect(),
            _ => nodes.iter().map(|node| Element::new(node.sum)).collect(),
        };
        let mut t = Tracer {
            nodes,
            rec: TraceRecorder::new(initial),
        };

        match self.op {
            SegmentOp::Build => {
                t.rec.emit(
                    EventKind::Start,
                    Vec::new(),
                    Narrative::new(
                        "Start",
                        format!("Build a segment tree over {} values.", self.values.len()),
                    )
                    .var("nodes", t.nodes.len()),
                );
                t.build(0);
                t.rec.mark_all(ElementStatus::Sorted);
                let total = t.nodes[0].sum;
                t.rec.emit(
                    EventKind::Done,
                    Vec::new(),
                    Narrative::new("Done", format!("Root holds the total {}.", total))
                        .var("sum", total),
                );
            }
            SegmentOp::Query { left, right } => {
                t.rec.emit(
                    EventKind::Start,
                    Vec::new(),
                    Narrative::new("Start", format!("Sum the range [{}, {}].", left, right))
                        .var("left", left)
                        .var("right", right),
                );
                let sum = t.query(0, left, right);
                t.rec.emit(
                    EventKind::Done,
                    Vec::new(),
                    Narrative::new(
                        "Done",
                        format!("sum([{}, {}]) = {}.", left, right, sum),
                    )
                    .var("left", left)
                    .var("right", right)
                    .var("sum", sum),
                );
            }
            SegmentOp::Update { index, value } => {
                t.rec.emit(
                    EventKind::Start,
                    Vec::new(),
                    Narrative::new("Start", format!("Set a[{}] to {}.", index, value))
                        .var("index", index)
                        .var("value", value),
                );
                t.update(0, index, value);
                let total = t.nodes[0].sum;
                t.rec.emit(
                    EventKind::Done,
                    Vec::new(),
                    Narrative::new("Done", format!("Root now holds {}.", total))
                        .var("index", index)
                        .var("value", value)
                        .var("sum", total),
                );
            }
        }

        Ok(t.rec.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_preorder() {
        assert_eq!(
            layout(4),
            vec![(0, 3), (0, 1), (0, 0), (1, 1), (2, 3), (2, 2), (3, 3)]
        );
        assert_eq!(layout(6).len(), 11);
    }

    #[test]
    fn test_build_ends_with_root_total() {
        let seq = SegmentTreeTrace::new(vec![1, 2, 3], SegmentOp::Build)
            .generate()
            .unwrap();
        assert_eq!(seq.first().values(), vec![0; 5]);
        assert_eq!(seq.last().elements[0].value, 6);
        assert_eq!(seq.last().variable("sum"), Some("6"));
    }

    #[test]
    fn test_update_propagates_to_root() {
        let seq = SegmentTreeTrace::new(vec![1, 2, 3, 4], SegmentOp::Update { index: 2, value: 10 })
            .generate()
            .unwrap();
        let last = seq.last();
        assert_eq!(last.elements[0].value, 17);
        // root, [2,3], leaf 2
        assert_eq!(last.count(ElementStatus::Modified), 3);
    }

    #[test]
    fn test_update_index_checked() {
        let err = SegmentTreeTrace::new(vec![1], SegmentOp::Update { index: 1, value: 0 }).generate();
        assert!(matches!(
            err,
            Err(ValidationError::IndexOutOfBounds { field: "update.index", .. })
        ));
    }

    #[test]
    fn test_overflowing_sum_rejected() {
        let err = SegmentTreeTrace::new(vec![i64::MAX, 1], SegmentOp::Build).generate();
        assert!(matches!(
            err,
            Err(ValidationError::InvalidValue { field: "values", .. })
        ));

        let update = SegmentOp::Update { index: 1, value: 1 };
        let err = SegmentTreeTrace::new(vec![i64::MAX, 0], update).generate();
        assert!(matches!(
            err,
            Err(ValidationError::InvalidValue { field: "update.value", .. })
        ));

        let update = SegmentOp::Update { index: 1, value: -1 };
        assert!(SegmentTreeTrace::new(vec![i64::MAX, 0], update).generate().is_ok());
    }
}
