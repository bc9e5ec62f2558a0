// Snapshot model shared by the generators, the live executor and the UI

use rustc_hash::FxHashMap;
use std::fmt;

/// Visual status of a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementStatus {
    #[default]
    Default,
    Comparing,
    Swapping,
    Sorted,
    Pivot,
    Visiting,
    Found,
    OutOfBounds,
    Modified,
    NotFound,
}

impl ElementStatus {
    /// Statuses that only describe the unit of work in flight
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ElementStatus::Comparing | ElementStatus::Swapping | ElementStatus::Pivot
        )
    }
}

/// One cell of the structure being visualized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub value: i64,
    pub status: ElementStatus,
}

impl Element {
    pub fn new(value: i64) -> Self {
        Element {
            value,
            status: ElementStatus::Default,
        }
    }
}

/// Build a default-status element list from raw values
pub fn elements_from(values: &[i64]) -> Vec<Element> {
    values.iter().copied().map(Element::new).collect()
}

/// What happened in the step that produced a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    Compare,
    Swap,
    Write,
    Visit,
    Accept,
    Reject,
    Update,
    Done,
}

impl EventKind {
    /// Events that count towards race statistics and force a series sample
    pub fn is_notable(self) -> bool {
        matches!(self, EventKind::Compare | EventKind::Swap | EventKind::Write)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Start => "start",
            EventKind::Compare => "compare",
            EventKind::Swap => "swap",
            EventKind::Write => "write",
            EventKind::Visit => "visit",
            EventKind::Accept => "accept",
            EventKind::Reject => "reject",
            EventKind::Update => "update",
            EventKind::Done => "done",
        };
        f.write_str(label)
    }
}

/// Tagged event emitted alongside every snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEvent {
    pub kind: EventKind,
    /// Element indices the event touched
    pub indices: Vec<usize>,
}

impl StepEvent {
    pub fn new(kind: EventKind, indices: Vec<usize>) -> Self {
        StepEvent { kind, indices }
    }
}

/// Human-readable description of a step. Never read by control logic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub operation: String,
    pub explanation: String,
    pub variables: FxHashMap<String, String>,
}

impl Narrative {
    pub fn new(operation: impl Into<String>, explanation: impl Into<String>) -> Self {
        Narrative {
            operation: operation.into(),
            explanation: explanation.into(),
            variables: FxHashMap::default(),
        }
    }

    /// Add a display variable (builder style)
    pub fn var(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    /// Variables ordered by name for stable display
    pub fn sorted_variables(&self) -> Vec<(&str, &str)> {
        let mut vars: Vec<(&str, &str)> = self
            .variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(b.0));
        vars
    }
}

/// Position of a snapshot within its run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
}

/// One immutable visual instant of an algorithm run
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<Element>,
    pub narrative: Narrative,
    pub progress: Progress,
    pub event: StepEvent,
}

impl Snapshot {
    pub fn new(elements: Vec<Element>, event: StepEvent, narrative: Narrative) -> Self {
        Snapshot {
            elements,
            narrative,
            progress: Progress::default(),
            event,
        }
    }

    /// Element values in order
    pub fn values(&self) -> Vec<i64> {
        self.elements.iter().map(|e| e.value).collect()
    }

    /// Element statuses in order
    pub fn statuses(&self) -> Vec<ElementStatus> {
        self.elements.iter().map(|e| e.status).collect()
    }

    /// Number of elements currently in `status`
    pub fn count(&self, status: ElementStatus) -> usize {
        self.elements.iter().filter(|e| e.status == status).count()
    }

    /// Look up a narrative variable
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.narrative.variables.get(name).map(|s| s.as_str())
    }
}

/// Reasons a list of snapshots cannot become a [`StepSequence`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("a step sequence needs at least one snapshot")]
    Empty,

    #[error("snapshot {index} has {got} elements, expected {expected}")]
    RaggedSnapshot {
        index: usize,
        expected: usize,
        got: usize,
    },
}

/// Ordered, finite, non-empty list of snapshots with a constant element count
#[derive(Debug, Clone, PartialEq)]
pub struct StepSequence {
    snapshots: Vec<Snapshot>,
}

impl StepSequence {
    /// Validate shape and stamp progress on every snapshot
    pub fn from_snapshots(mut snapshots: Vec<Snapshot>) -> Result<Self, SequenceError> {
        let width = snapshots
            .first()
            .map(|s| s.elements.len())
            .ok_or(SequenceError::Empty)?;

        let total = snapshots.len();
        for (index, snapshot) in snapshots.iter_mut().enumerate() {
            if snapshot.elements.len() != width {
                return Err(SequenceError::RaggedSnapshot {
                    index,
                    expected: width,
                    got: snapshot.elements.len(),
                });
            }
            snapshot.progress = Progress {
                current_step: index,
                total_steps: total,
            };
        }

        Ok(StepSequence { snapshots })
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn first(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    pub fn last(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Get the number of snapshots (always at least one)
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// A step sequence is never empty; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Element count shared by every snapshot
    pub fn width(&self) -> usize {
        self.first().elements.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

/// Accumulates snapshots while a generator walks its algorithm.
///
/// The recorder owns the working element list; each `emit` copies it, so a
/// snapshot already pushed can never observe later mutation.
#[derive(Debug)]
pub struct TraceRecorder {
    pub elements: Vec<Element>,
    snapshots: Vec<Snapshot>,
}

impl TraceRecorder {
    pub fn new(elements: Vec<Element>) -> Self {
        TraceRecorder {
            elements,
            snapshots: Vec::new(),
        }
    }

    /// Set one element's status
    pub fn mark(&mut self, index: usize, status: ElementStatus) {
        if let Some(element) = self.elements.get_mut(index) {
            element.status = status;
        }
    }

    /// Set every element in `range` to `status`
    pub fn mark_range(&mut self, range: std::ops::RangeInclusive<usize>, status: ElementStatus) {
        for index in range {
            self.mark(index, status);
        }
    }

    /// Reset every element to `status`
    pub fn mark_all(&mut self, status: ElementStatus) {
        for element in &mut self.elements {
            element.status = status;
        }
    }

    /// Replace transient statuses with `Default`
    pub fn clear_transient(&mut self) {
        for element in &mut self.elements {
            if element.status.is_transient() {
                element.status = ElementStatus::Default;
            }
        }
    }

    /// Append a copy of the working state
    pub fn emit(&mut self, kind: EventKind, indices: Vec<usize>, narrative: Narrative) {
        self.snapshots.push(Snapshot::new(
            self.elements.clone(),
            StepEvent::new(kind, indices),
            narrative,
        ));
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Seal the trace into a sequence
    pub fn finish(self) -> StepSequence {
        // Every emit copies the same-length working list, so the shape check
        // cannot fail; an empty recorder still yields the no-op snapshot.
        let width = self.elements.len();
        let mut snapshots = self.snapshots;
        if snapshots.is_empty() {
            snapshots.push(Snapshot::new(
                self.elements,
                StepEvent::new(EventKind::Done, Vec::new()),
                Narrative::new("Nothing to do", "The structure is empty."),
            ));
        }
        debug_assert!(snapshots.iter().all(|s| s.elements.len() == width));
        StepSequence { snapshots }.restamped()
    }
}

impl StepSequence {
    fn restamped(mut self) -> Self {
        let total = self.snapshots.len();
        for (index, snapshot) in self.snapshots.iter_mut().enumerate() {
            snapshot.progress = Progress {
                current_step: index,
                total_steps: total,
            };
        }
        self
    }
}

/// The single snapshot describing an empty structure
pub fn empty_sequence(structure: &str) -> StepSequence {
    let snapshot = Snapshot::new(
        Vec::new(),
        StepEvent::new(EventKind::Done, Vec::new()),
        Narrative::new(
            "Nothing to do",
            format!("The {} is empty, so there are no steps to show.", structure),
        ),
    );
    StepSequence {
        snapshots: vec![snapshot],
    }
    .restamped()
}
