//! Kadane's maximum-subarray scan

use super::{check_run_sums, Generator};
use crate::errors::TraceResult;
use crate::snapshot::{
    elements_from, empty_sequence, ElementStatus, EventKind, Narrative, StepSequence,
    TraceRecorder,
};

#[derive(Debug, Clone)]
pub struct Kadane {
    pub values: Vec<i64>,
}

impl Kadane {
    pub fn new(values: Vec<i64>) -> Self {
        Kadane { values }
    }
}

/// Running state of the scan
struct Window {
    current: i64,
    current_start: usize,
    best: i64,
    start: usize,
    end: usize,
}

impl Window {
    fn narrative(&self, operation: String, explanation: String) -> Narrative {
        Narrative::new(operation, explanation)
            .var("current", self.current)
            .var("maxSoFar", self.best)
            .var("start", self.start)
            .var("end", self.end)
    }
}

impl Generator for Kadane {
    fn name(&self) -> &str {
        "kadane"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        check_run_sums("values", &self.values)?;
        if self.values.is_empty() {
            return Ok(empty_sequence("array"));
        }

        let values = &self.values;
        let mut rec = TraceRecorder::new(elements_from(values));
        rec.emit(
            EventKind::Start,
            Vec::new(),
            Narrative::new(
                "Start",
                format!("Scan {} values for the largest contiguous sum.", values.len()),
            ),
        );

        let mut w = Window {
            current: values[0],
            current_start: 0,
            best: values[0],
            start: 0,
            end: 0,
        };
        rec.mark(0, ElementStatus::Comparing);
        rec.emit(
            EventKind::Compare,
            vec![0],
            w.narrative(
                "Seed with a[0]".to_string(),
                format!("current = maxSoFar = {}.", values[0]),
            ),
        );

        for (i, &v) in values.iter().enumerate().skip(1) {
            let explanation = if w.current < 0 {
                w.current = v;
                w.current_start = i;
                format!("Running sum was negative, restart at a[{}] = {}.", i, v)
            } else {
                w.current += v;
                format!("Extend the window with a[{}] = {}.", i, v)
            };
            if w.current > w.best {
                w.best = w.current;
                w.start = w.current_start;
                w.end = i;
            }

            rec.mark_all(ElementStatus::Default);
            rec.mark_range(w.current_start..=i, ElementStatus::Visiting);
            rec.mark(i, ElementStatus::Comparing);
            rec.emit(
                EventKind::Compare,
                vec![i],
                w.narrative(format!("Consider a[{}]", i), explanation),
            );
        }

        rec.mark_all(ElementStatus::Default);
        rec.mark_range(w.start..=w.end, ElementStatus::Found);
        rec.emit(
            EventKind::Done,
            (w.start..=w.end).collect(),
            w.narrative(
                "Done".to_string(),
                format!(
                    "Best subarray is [{}, {}] with sum {}.",
                    w.start, w.end, w.best
                ),
            ),
        );
        Ok(rec.finish())
    }
}
