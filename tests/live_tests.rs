// Live executors and races, run on virtual time inside a LocalSet

use algoreplay::exec::{
    record, run_single, Algorithm, ControlHandle, Executor, RunFuture, RunOutcome, SortAlgorithm,
    StepSink,
};
use algoreplay::input::random_values;
use algoreplay::race::{ParticipantOutcome, RaceController};
use algoreplay::snapshot::{ElementStatus, EventKind, Snapshot};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::{spawn_local, LocalSet};

/// Compares once, then fails
struct Faulty;

impl Algorithm for Faulty {
    fn name(&self) -> &str {
        "Faulty"
    }

    fn run<'a>(&'a self, ex: &'a mut Executor) -> RunFuture<'a> {
        Box::pin(async move {
            ex.compare(0, 1).await?;
            Err(ex.fault("boom"))
        })
    }
}

fn counting_sink() -> (Rc<Cell<usize>>, StepSink) {
    let count = Rc::new(Cell::new(0usize));
    let sink: StepSink = {
        let count = Rc::clone(&count);
        Box::new(move |_: &Snapshot| count.set(count.get() + 1))
    };
    (count, sink)
}

fn collecting_sink() -> (Rc<RefCell<Vec<Snapshot>>>, StepSink) {
    let frames: Rc<RefCell<Vec<Snapshot>>> = Rc::default();
    let sink: StepSink = {
        let frames = Rc::clone(&frames);
        Box::new(move |s: &Snapshot| frames.borrow_mut().push(s.clone()))
    };
    (frames, sink)
}

fn shape(s: &Snapshot) -> (Vec<i64>, Vec<ElementStatus>, EventKind) {
    (s.values(), s.statuses(), s.event.kind)
}

fn count_kind(frames: &[Snapshot], kind: EventKind) -> usize {
    frames.iter().filter(|s| s.event.kind == kind).count()
}

#[tokio::test(start_paused = true)]
async fn test_stop_emits_nothing_further() {
    LocalSet::new()
        .run_until(async {
            let control = ControlHandle::new(Duration::from_millis(10));
            let (count, sink) = counting_sink();
            let signal = control.signal();
            let values = random_values(30, 100, 1);
            let handle = spawn_local(async move {
                run_single(&SortAlgorithm::Bubble, &values, signal, sink).await
            });

            tokio::time::sleep(Duration::from_millis(105)).await;
            control.cancel();
            let at_cancel = count.get();

            let summary = handle.await.unwrap().unwrap();
            assert_eq!(summary.outcome, RunOutcome::Cancelled);
            assert!(at_cancel > 0);
            assert_eq!(count.get(), at_cancel);
            assert_eq!(summary.steps, at_cancel);
            assert_eq!(summary.elements.len(), 30);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay_leaves_last_snapshot_final() {
    LocalSet::new()
        .run_until(async {
            let control = ControlHandle::new(Duration::from_millis(10));
            let (frames, sink) = collecting_sink();
            let signal = control.signal();
            let handle = spawn_local(async move {
                run_single(&SortAlgorithm::Selection, &[5, 4, 3, 2, 1], signal, sink).await
            });

            // lands inside the delay after the first comparison
            tokio::time::sleep(Duration::from_millis(5)).await;
            control.cancel();

            let summary = handle.await.unwrap().unwrap();
            assert_eq!(summary.outcome, RunOutcome::Cancelled);
            let frames = frames.borrow();
            assert_eq!(frames.len(), 2);
            assert_eq!(summary.steps, frames.len());
            assert_eq!(summary.comparisons, 1);
            let last = frames.last().unwrap();
            assert_eq!(last.event.kind, EventKind::Compare);
            assert_eq!(summary.elements, last.elements);
            assert_eq!(summary.elements[0].status, ElementStatus::Pivot);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_emits_nothing() {
    let control = ControlHandle::new(Duration::ZERO);
    control.cancel();
    let (count, sink) = counting_sink();
    let summary = run_single(&SortAlgorithm::Heap, &[3, 2, 1], control.signal(), sink)
        .await
        .unwrap();
    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(count.get(), 0);
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.comparisons + summary.swaps + summary.writes, 0);
    let values: Vec<i64> = summary.elements.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![3, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_does_not_change_the_trace() {
    let values = random_values(12, 50, 9);
    let reference = record(&SortAlgorithm::Quick, &values).await.unwrap();

    LocalSet::new()
        .run_until(async {
            let control = ControlHandle::new(Duration::from_millis(5));
            let (frames, sink) = collecting_sink();
            let signal = control.signal();
            let input = values.clone();
            let handle = spawn_local(async move {
                run_single(&SortAlgorithm::Quick, &input, signal, sink).await
            });

            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(12)).await;
                control.pause();
                let paused_at = frames.borrow().len();
                tokio::time::sleep(Duration::from_millis(30)).await;
                assert_eq!(frames.borrow().len(), paused_at, "emitted while paused");
                control.resume();
            }

            let summary = handle.await.unwrap().unwrap();
            assert_eq!(summary.outcome, RunOutcome::Completed);
            {
                let frames = frames.borrow();
                assert_eq!(summary.steps, frames.len());
                assert_eq!(summary.comparisons, count_kind(&frames, EventKind::Compare));
                assert_eq!(summary.swaps, count_kind(&frames, EventKind::Swap));
                assert_eq!(summary.writes, count_kind(&frames, EventKind::Write));
                assert_eq!(summary.elements, frames.last().unwrap().elements);
            }
            let live: Vec<_> = frames.borrow().iter().map(shape).collect();
            let recorded: Vec<_> = reference.iter().map(shape).collect();
            assert_eq!(live, recorded);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_fault_is_fatal_for_a_single_run() {
    let control = ControlHandle::new(Duration::ZERO);
    let (_, sink) = counting_sink();
    let fault = run_single(&Faulty, &[2, 1], control.signal(), sink)
        .await
        .err()
        .expect("fault swallowed");
    assert_eq!(fault.algorithm, "Faulty");
    assert!(fault.to_string().contains("boom"));
}

#[tokio::test(start_paused = true)]
async fn test_race_of_two_on_twenty_elements() {
    LocalSet::new()
        .run_until(async {
            let algorithms: Vec<Rc<dyn Algorithm>> =
                vec![Rc::new(SortAlgorithm::Bubble), Rc::new(SortAlgorithm::Merge)];
            let race = RaceController::new(
                random_values(20, 100, 42),
                algorithms,
                Duration::from_millis(100),
            )
            .unwrap();

            let report = race.run().await;
            assert_eq!(report.results.len(), 2);
            assert!(report.elapsed_secs >= 1);
            assert!(report.winner().is_some());

            for participant in race.participants() {
                let stats = participant.stats();
                assert!(stats.comparisons > 0, "{}", participant.name());
                assert!(stats.is_complete && !stats.is_running);

                let series = participant.series();
                assert!(!series.is_empty());
                for pair in series.windows(2) {
                    assert!(pair[0].elapsed_secs <= pair[1].elapsed_secs);
                    assert!(pair[0].step < pair[1].step);
                    assert!(pair[0].comparisons <= pair[1].comparisons);
                }

                let latest = participant.latest().unwrap();
                assert_eq!(latest.event.kind, EventKind::Done);
                assert!(latest.values().windows(2).all(|w| w[0] <= w[1]));
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_race_survives_a_failing_participant() {
    LocalSet::new()
        .run_until(async {
            let algorithms: Vec<Rc<dyn Algorithm>> =
                vec![Rc::new(Faulty), Rc::new(SortAlgorithm::Insertion)];
            let race =
                RaceController::new(vec![4, 2, 3, 1], algorithms, Duration::from_millis(1)).unwrap();

            let report = race.run().await;
            assert!(matches!(report.results[0].outcome, ParticipantOutcome::Failed(_)));
            assert_eq!(report.results[1].outcome, ParticipantOutcome::Completed);
            assert_eq!(report.winner(), Some("Insertion Sort"));

            let failed = race.participants()[0].stats();
            assert!(failed.failure.is_some());
            assert!(!failed.is_running && !failed.is_complete);
            assert_eq!(failed.comparisons, 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_race_pause_freezes_stats_and_stop_settles_everyone() {
    LocalSet::new()
        .run_until(async {
            let algorithms: Vec<Rc<dyn Algorithm>> = vec![
                Rc::new(SortAlgorithm::Selection),
                Rc::new(SortAlgorithm::Heap),
                Rc::new(SortAlgorithm::Bubble),
            ];
            let race = Rc::new(
                RaceController::new(random_values(20, 100, 3), algorithms, Duration::from_millis(100))
                    .unwrap(),
            );
            let handle = spawn_local({
                let race = Rc::clone(&race);
                async move { race.run().await }
            });

            tokio::time::sleep(Duration::from_millis(550)).await;
            race.pause();
            let frozen: Vec<_> = race.participants().iter().map(|p| p.stats()).collect();
            tokio::time::sleep(Duration::from_secs(3)).await;
            let later: Vec<_> = race.participants().iter().map(|p| p.stats()).collect();
            assert_eq!(frozen, later);
            assert!(race.is_running());

            race.stop();
            let report = handle.await.unwrap();
            assert!(!race.is_running());
            assert!(report.winner().is_none());
            for result in &report.results {
                assert_eq!(result.outcome, ParticipantOutcome::Cancelled);
                assert_eq!(result.stats.finish_rank, None);
            }

            // the shared clock stops with the race
            let elapsed = race.elapsed_secs();
            tokio::time::sleep(Duration::from_secs(5)).await;
            assert_eq!(race.elapsed_secs(), elapsed);
        })
        .await;
}
