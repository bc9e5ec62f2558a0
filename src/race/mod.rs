//! Side-by-side races between live executors
//!
//! A [`RaceController`] runs two to four algorithms "at once" on a single
//! thread. Each participant is a local task with its own copy of the input;
//! the tasks interleave at their suspension points. All participants observe
//! the same [`ControlHandle`], so pause, resume, stop and speed changes apply
//! to every one of them together.
//!
//! Must be driven from inside a `tokio::task::LocalSet`.

use crate::errors::ValidationError;
use crate::exec::{Algorithm, ControlHandle, Executor, RunOutcome, StepSink};
use crate::snapshot::{elements_from, EventKind, Snapshot};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 4;

/// Live counters for one participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub comparisons: usize,
    pub swaps: usize,
    pub current_step: usize,
    pub is_running: bool,
    pub is_complete: bool,
    /// Set when the participant's algorithm faulted
    pub failure: Option<String>,
    /// 1 for the first participant to complete, 2 for the next, ...
    pub finish_rank: Option<usize>,
}

/// One point of the sampled time series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub step: usize,
    pub comparisons: usize,
    pub swaps: usize,
    pub elapsed_secs: u64,
}

/// Decides which steps are recorded in the series.
///
/// Every compare, swap or write is recorded immediately; any other step only
/// every `stride` steps.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSampler {
    stride: usize,
}

impl SeriesSampler {
    pub fn new(stride: usize) -> Self {
        SeriesSampler {
            stride: stride.max(1),
        }
    }

    pub fn should_sample(&self, step: usize, kind: EventKind) -> bool {
        kind.is_notable() || step % self.stride == 0
    }
}

impl Default for SeriesSampler {
    fn default() -> Self {
        Self::new(5)
    }
}

/// How one participant's run settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

/// State shared between a participant's task and the controller
pub struct Participant {
    algorithm: Rc<dyn Algorithm>,
    stats: Rc<RefCell<RunStats>>,
    latest: Rc<RefCell<Option<Snapshot>>>,
    series: Rc<RefCell<Vec<SeriesPoint>>>,
}

impl Participant {
    fn new(algorithm: Rc<dyn Algorithm>) -> Self {
        Participant {
            algorithm,
            stats: Rc::default(),
            latest: Rc::default(),
            series: Rc::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.algorithm.name()
    }

    pub fn stats(&self) -> RunStats {
        self.stats.borrow().clone()
    }

    /// Most recent snapshot emitted by this participant
    pub fn latest(&self) -> Option<Snapshot> {
        self.latest.borrow().clone()
    }

    pub fn series(&self) -> Vec<SeriesPoint> {
        self.series.borrow().clone()
    }
}

/// Final result for one participant
#[derive(Debug, Clone)]
pub struct ParticipantResult {
    pub name: String,
    pub outcome: ParticipantOutcome,
    pub stats: RunStats,
}

#[derive(Debug, Clone)]
pub struct RaceReport {
    pub elapsed_secs: u64,
    pub results: Vec<ParticipantResult>,
}

impl RaceReport {
    /// Name of the first participant to complete, if any did
    pub fn winner(&self) -> Option<&str> {
        self.results
            .iter()
            .filter(|r| r.stats.finish_rank == Some(1))
            .map(|r| r.name.as_str())
            .next()
    }
}

pub struct RaceController {
    input: Vec<i64>,
    participants: Vec<Participant>,
    control: ControlHandle,
    elapsed: Rc<Cell<u64>>,
    finished: Rc<Cell<usize>>,
    tick: Duration,
    sampler: SeriesSampler,
}

impl RaceController {
    pub fn new(
        input: Vec<i64>,
        algorithms: Vec<Rc<dyn Algorithm>>,
        speed: Duration,
    ) -> Result<Self, ValidationError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&algorithms.len()) {
            return Err(ValidationError::ParticipantCount {
                got: algorithms.len(),
                min: MIN_PARTICIPANTS,
                max: MAX_PARTICIPANTS,
            });
        }
        if input.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "input",
                message: "a race needs at least one value".to_string(),
            });
        }

        Ok(RaceController {
            input,
            participants: algorithms.into_iter().map(Participant::new).collect(),
            control: ControlHandle::new(speed),
            elapsed: Rc::new(Cell::new(0)),
            finished: Rc::new(Cell::new(0)),
            tick: Duration::from_secs(1),
            sampler: SeriesSampler::default(),
        })
    }

    /// Period of the shared elapsed-time clock
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_sampler(mut self, sampler: SeriesSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn input(&self) -> &[i64] {
        &self.input
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.get()
    }

    /// Writer handle for the UI; all participants observe it
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Cancel every participant. A stopped race cannot be restarted.
    pub fn stop(&self) {
        log::info!("race: stop requested");
        self.control.cancel();
    }

    pub fn set_speed(&self, speed: Duration) {
        self.control.set_speed(speed);
    }

    /// Whether any participant is still running
    pub fn is_running(&self) -> bool {
        self.participants.iter().any(|p| p.stats.borrow().is_running)
    }

    /// Launch every participant and the shared clock, then wait until all
    /// participants have settled.
    pub async fn run(&self) -> RaceReport {
        log::info!(
            "race: {} participants on {} elements",
            self.participants.len(),
            self.input.len()
        );

        let ticker = self.spawn_ticker();
        let handles: Vec<JoinHandle<ParticipantOutcome>> =
            self.participants.iter().map(|p| self.spawn_participant(p)).collect();

        let mut results = Vec::with_capacity(handles.len());
        for (participant, handle) in self.participants.iter().zip(handles) {
            // a panicked task still counts as settled
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    let message = format!("task aborted: {}", err);
                    log::warn!("race: {} {}", participant.name(), message);
                    let mut stats = participant.stats.borrow_mut();
                    stats.is_running = false;
                    stats.failure = Some(message.clone());
                    ParticipantOutcome::Failed(message)
                }
            };
            results.push(ParticipantResult {
                name: participant.name().to_string(),
                outcome,
                stats: participant.stats(),
            });
        }

        ticker.abort();
        let report = RaceReport {
            elapsed_secs: self.elapsed.get(),
            results,
        };
        log::info!(
            "race: finished after {}s, winner {:?}",
            report.elapsed_secs,
            report.winner()
        );
        report
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let elapsed = Rc::clone(&self.elapsed);
        let tick = self.tick;
        tokio::task::spawn_local(async move {
            let start = tokio::time::Instant::now() + tick;
            let mut interval = tokio::time::interval_at(start, tick);
            loop {
                interval.tick().await;
                elapsed.set(elapsed.get() + 1);
            }
        })
    }

    fn spawn_participant(&self, participant: &Participant) -> JoinHandle<ParticipantOutcome> {
        let algorithm = Rc::clone(&participant.algorithm);
        let stats = Rc::clone(&participant.stats);
        let finished = Rc::clone(&self.finished);
        let elements = elements_from(&self.input);
        let signal = self.control.signal();
        let sink = self.step_sink(participant);

        *stats.borrow_mut() = RunStats {
            is_running: true,
            ..RunStats::default()
        };

        tokio::task::spawn_local(async move {
            let result = Executor::new(elements, signal, sink)
                .run(algorithm.as_ref())
                .await;

            let mut stats = stats.borrow_mut();
            stats.is_running = false;
            match result {
                Ok(summary) if summary.outcome == RunOutcome::Completed => {
                    finished.set(finished.get() + 1);
                    stats.is_complete = true;
                    stats.finish_rank = Some(finished.get());
                    ParticipantOutcome::Completed
                }
                Ok(_) => ParticipantOutcome::Cancelled,
                Err(fault) => {
                    log::warn!("race: participant failed: {}", fault);
                    stats.failure = Some(fault.to_string());
                    ParticipantOutcome::Failed(fault.to_string())
                }
            }
        })
    }

    /// Per-participant callback: updates only that participant's state
    fn step_sink(&self, participant: &Participant) -> StepSink {
        let stats = Rc::clone(&participant.stats);
        let latest = Rc::clone(&participant.latest);
        let series = Rc::clone(&participant.series);
        let elapsed = Rc::clone(&self.elapsed);
        let sampler = self.sampler;

        Box::new(move |snapshot: &Snapshot| {
            let mut stats = stats.borrow_mut();
            match snapshot.event.kind {
                EventKind::Compare => stats.comparisons += 1,
                EventKind::Swap | EventKind::Write => stats.swaps += 1,
                _ => {}
            }
            stats.current_step = snapshot.progress.current_step;

            if sampler.should_sample(snapshot.progress.current_step, snapshot.event.kind) {
                series.borrow_mut().push(SeriesPoint {
                    step: snapshot.progress.current_step,
                    comparisons: stats.comparisons,
                    swaps: stats.swaps,
                    elapsed_secs: elapsed.get(),
                });
            }
            *latest.borrow_mut() = Some(snapshot.clone());
        })
    }
}
