//! Cooperative live executor
//!
//! An [`Algorithm`] body drives an [`Executor`] through its unit-of-work
//! primitives ([`Executor::compare`], [`Executor::swap`], [`Executor::write`]).
//! Each primitive, in order:
//!
//! 1. returns [`Interrupt::Cancelled`] if the run was cancelled,
//! 2. parks while the run is paused (re-checking cancel on every wake),
//! 3. mutates the working array and emits a [`Snapshot`] to the sink,
//! 4. sleeps for the current speed, then re-checks cancel before handing
//!    control back to the body.
//!
//! The algorithm body propagates interrupts with `?`, so a cancel unwinds the
//! whole call chain without touching the array again.
//!
//! Everything here is single-threaded: executors run as local tasks on one
//! thread and share nothing but the read side of a [`ControlHandle`].

pub mod signal;
pub mod sorts;

use crate::errors::ExecutionFault;
use crate::snapshot::{
    elements_from, empty_sequence, Element, ElementStatus, EventKind, Narrative, Progress,
    Snapshot, StepEvent, StepSequence,
};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

pub use signal::{Cancelled, ControlHandle, RunSignal, RunState};
pub use sorts::SortAlgorithm;

/// Why an algorithm body stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    Fault(String),
}

impl From<Cancelled> for Interrupt {
    fn from(_: Cancelled) -> Self {
        Interrupt::Cancelled
    }
}

/// Control-flow result of an algorithm body
pub type Flow = Result<(), Interrupt>;

/// Boxed future returned by [`Algorithm::run`]
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Flow> + 'a>>;

/// Receives every snapshot as it is produced
pub type StepSink = Box<dyn FnMut(&Snapshot)>;

/// Pluggable algorithm body
pub trait Algorithm {
    fn name(&self) -> &str;

    fn run<'a>(&'a self, ex: &'a mut Executor) -> RunFuture<'a>;
}

/// How a run that did not fault ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Counters and final state of a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub steps: usize,
    pub comparisons: usize,
    pub swaps: usize,
    pub writes: usize,
    pub elements: Vec<Element>,
}

/// Owns one working array and drives one algorithm body over it
pub struct Executor {
    elements: Vec<Element>,
    signal: RunSignal,
    sink: StepSink,
    algorithm: String,
    step: usize,
    comparisons: usize,
    swaps: usize,
    writes: usize,
}

impl Executor {
    pub fn new(elements: Vec<Element>, signal: RunSignal, sink: StepSink) -> Self {
        Executor {
            elements,
            signal,
            sink,
            algorithm: String::new(),
            step: 0,
            comparisons: 0,
            swaps: 0,
            writes: 0,
        }
    }

    /// Run `algorithm` to completion, cancellation or fault
    pub async fn run(mut self, algorithm: &dyn Algorithm) -> Result<RunSummary, ExecutionFault> {
        self.algorithm = algorithm.name().to_string();
        log::debug!(
            "{}: starting on {} elements",
            self.algorithm,
            self.elements.len()
        );

        if self.signal.is_cancelled() {
            return Ok(self.summary(RunOutcome::Cancelled));
        }

        let start = Narrative::new(
            "Start",
            format!("{} on {} elements.", self.algorithm, self.elements.len()),
        );
        self.emit(EventKind::Start, Vec::new(), start);

        let flow = algorithm.run(&mut self).await;
        match flow {
            Ok(()) if !self.signal.is_cancelled() => {
                self.mark_all(ElementStatus::Sorted);
                let done = Narrative::new(
                    "Done",
                    format!(
                        "{} finished after {} comparisons and {} swaps.",
                        self.algorithm, self.comparisons, self.swaps
                    ),
                )
                .var("comparisons", self.comparisons)
                .var("swaps", self.swaps);
                self.emit(EventKind::Done, Vec::new(), done);
                log::debug!("{}: completed in {} steps", self.algorithm, self.step);
                Ok(self.summary(RunOutcome::Completed))
            }
            Ok(()) | Err(Interrupt::Cancelled) => {
                log::debug!("{}: cancelled at step {}", self.algorithm, self.step);
                Ok(self.summary(RunOutcome::Cancelled))
            }
            Err(Interrupt::Fault(message)) => {
                log::warn!("{}: fault at step {}: {}", self.algorithm, self.step, message);
                Err(ExecutionFault {
                    algorithm: self.algorithm.clone(),
                    step: self.step,
                    message,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current value at `index`
    pub fn value(&self, index: usize) -> Result<i64, Interrupt> {
        self.elements
            .get(index)
            .map(|e| e.value)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Change a status without emitting; visible in the next snapshot
    pub fn mark(&mut self, index: usize, status: ElementStatus) {
        if let Some(element) = self.elements.get_mut(index) {
            element.status = status;
        }
    }

    /// Mark an element as in its final position
    pub fn settle(&mut self, index: usize) {
        self.mark(index, ElementStatus::Sorted);
    }

    /// Build an interrupt describing an algorithm failure
    pub fn fault(&self, message: impl Into<String>) -> Interrupt {
        Interrupt::Fault(message.into())
    }

    /// Compare the values at two positions
    pub async fn compare(&mut self, i: usize, j: usize) -> Result<Ordering, Interrupt> {
        let (a, b) = (self.value(i)?, self.value(j)?);
        self.compare_values((i, a), (j, b)).await
    }

    /// Compare two values, highlighting the positions they belong to.
    ///
    /// Used when one side lives in scratch space, as in a merge.
    pub async fn compare_values(
        &mut self,
        (i, a): (usize, i64),
        (j, b): (usize, i64),
    ) -> Result<Ordering, Interrupt> {
        self.checkpoint().await?;
        for index in [i, j] {
            if self.elements.get(index).map(|e| e.status) != Some(ElementStatus::Pivot) {
                self.mark(index, ElementStatus::Comparing);
            }
        }
        self.comparisons += 1;
        let ordering = a.cmp(&b);
        let relation = match ordering {
            Ordering::Less => "<",
            Ordering::Equal => "=",
            Ordering::Greater => ">",
        };
        let narrative = Narrative::new(
            "Compare",
            format!("{} {} {}", a, relation, b),
        )
        .var("i", i)
        .var("j", j)
        .var("comparisons", self.comparisons);
        self.emit(EventKind::Compare, vec![i, j], narrative);
        self.pace().await?;
        Ok(ordering)
    }

    /// Swap the values at two positions
    pub async fn swap(&mut self, i: usize, j: usize) -> Flow {
        self.value(i)?;
        self.value(j)?;
        self.checkpoint().await?;
        self.elements.swap(i, j);
        self.mark(i, ElementStatus::Swapping);
        self.mark(j, ElementStatus::Swapping);
        self.swaps += 1;
        let narrative = Narrative::new(
            "Swap",
            format!(
                "Swap positions {} and {} ({} <-> {}).",
                i, j, self.elements[j].value, self.elements[i].value
            ),
        )
        .var("i", i)
        .var("j", j)
        .var("swaps", self.swaps);
        self.emit(EventKind::Swap, vec![i, j], narrative);
        self.pace().await?;
        Ok(())
    }

    /// Overwrite the value at `index`
    pub async fn write(&mut self, index: usize, value: i64) -> Flow {
        let old = self.value(index)?;
        self.checkpoint().await?;
        self.elements[index].value = value;
        self.mark(index, ElementStatus::Swapping);
        self.writes += 1;
        let narrative = Narrative::new(
            "Write",
            format!("Position {} takes {} (was {}).", index, value, old),
        )
        .var("index", index)
        .var("writes", self.writes);
        self.emit(EventKind::Write, vec![index], narrative);
        self.pace().await?;
        Ok(())
    }

    /// Steps 1 and 2 of every unit: cancel check, then pause wait
    async fn checkpoint(&mut self) -> Flow {
        if self.signal.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        self.signal.wait_while_paused().await?;
        self.clear_transient();
        Ok(())
    }

    /// End-of-unit delay. A cancel that lands during the sleep ends the unit
    /// here, so the last emitted snapshot is the final state of the array.
    async fn pace(&mut self) -> Flow {
        self.signal.throttle().await;
        if self.signal.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        Ok(())
    }

    fn clear_transient(&mut self) {
        for element in &mut self.elements {
            if matches!(
                element.status,
                ElementStatus::Comparing | ElementStatus::Swapping
            ) {
                element.status = ElementStatus::Default;
            }
        }
    }

    fn mark_all(&mut self, status: ElementStatus) {
        for element in &mut self.elements {
            element.status = status;
        }
    }

    fn emit(&mut self, kind: EventKind, indices: Vec<usize>, narrative: Narrative) {
        let mut snapshot = Snapshot::new(
            self.elements.clone(),
            StepEvent::new(kind, indices),
            narrative,
        );
        // total is unknown while live; it grows with the run
        snapshot.progress = Progress {
            current_step: self.step,
            total_steps: self.step + 1,
        };
        self.step += 1;
        (self.sink)(&snapshot);
    }

    fn out_of_bounds(&self, index: usize) -> Interrupt {
        Interrupt::Fault(format!(
            "index {} out of bounds for {} elements",
            index,
            self.elements.len()
        ))
    }

    fn summary(self, outcome: RunOutcome) -> RunSummary {
        RunSummary {
            outcome,
            steps: self.step,
            comparisons: self.comparisons,
            swaps: self.swaps,
            writes: self.writes,
            elements: self.elements,
        }
    }
}

/// Run an algorithm with no delay and collect every snapshot.
///
/// This is the materialized form of a live run: the result can be handed to
/// the scrub player like any generated trace.
pub async fn record(algorithm: &dyn Algorithm, values: &[i64]) -> Result<StepSequence, ExecutionFault> {
    if values.is_empty() {
        return Ok(empty_sequence("array"));
    }

    let control = ControlHandle::new(Duration::ZERO);
    let frames: Rc<RefCell<Vec<Snapshot>>> = Rc::default();
    let sink: StepSink = {
        let frames = Rc::clone(&frames);
        Box::new(move |snapshot: &Snapshot| frames.borrow_mut().push(snapshot.clone()))
    };

    Executor::new(elements_from(values), control.signal(), sink)
        .run(algorithm)
        .await?;

    let snapshots = frames.take();
    StepSequence::from_snapshots(snapshots).map_err(|e| ExecutionFault {
        algorithm: algorithm.name().to_string(),
        step: 0,
        message: e.to_string(),
    })
}

/// Run a single algorithm live.
///
/// Unlike a race participant, a fault here aborts the run and is returned to
/// the caller.
pub async fn run_single(
    algorithm: &dyn Algorithm,
    values: &[i64],
    signal: RunSignal,
    sink: StepSink,
) -> Result<RunSummary, ExecutionFault> {
    log::info!("running {} on {} elements", algorithm.name(), values.len());
    Executor::new(elements_from(values), signal, sink)
        .run(algorithm)
        .await
}
