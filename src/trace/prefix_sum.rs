//! Prefix-sum build with an optional range query

use super::{check_run_sums, Generator};
use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::{
    elements_from, empty_sequence, ElementStatus, EventKind, Narrative, StepSequence,
    TraceRecorder,
};

/// Build `P[i] = a[0] + ... + a[i]` in place, then optionally answer
/// `sum(a[left..=right])` as `P[right] - P[left - 1]`.
#[derive(Debug, Clone)]
pub struct PrefixSum {
    pub values: Vec<i64>,
    pub query: Option<(usize, usize)>,
}

impl PrefixSum {
    pub fn new(values: Vec<i64>) -> Self {
        PrefixSum {
            values,
            query: None,
        }
    }

    pub fn with_query(mut self, left: usize, right: usize) -> Self {
        self.query = Some((left, right));
        self
    }

    fn validate(&self) -> TraceResult<()> {
        check_run_sums("values", &self.values)?;
        if let Some((left, right)) = self.query {
            if left > right {
                return Err(ValidationError::InvertedRange {
                    field: "query",
                    left,
                    right,
                });
            }
            if right >= self.values.len() {
                return Err(ValidationError::IndexOutOfBounds {
                    field: "query.right",
                    index: right,
                    len: self.values.len(),
                });
            }
        }
        Ok(())
    }
}

impl Generator for PrefixSum {
    fn name(&self) -> &str {
        "prefix sum"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        self.validate()?;
        if self.values.is_empty() {
            return Ok(empty_sequence("array"));
        }

        let n = self.values.len();
        let mut rec = TraceRecorder::new(elements_from(&self.values));
        rec.emit(
            EventKind::Start,
            Vec::new(),
            Narrative::new("Start", format!("Build prefix sums over {} values.", n))
                .var("n", n),
        );

        for i in 0..n {
            if i > 0 {
                let carried = rec.elements[i - 1].value;
                rec.elements[i].value += carried;
            }
            rec.mark(i, ElementStatus::Pivot);
            let prefix = rec.elements[i].value;
            let explanation = if i == 0 {
                format!("P[0] = a[0] = {}.", prefix)
            } else {
                format!(
                    "P[{}] = P[{}] + a[{}] = {}.",
                    i,
                    i - 1,
                    i,
                    prefix
                )
            };
            rec.emit(
                EventKind::Update,
                vec![i],
                Narrative::new(format!("Compute P[{}]", i), explanation)
                    .var("i", i)
                    .var("prefix", prefix),
            );
            rec.mark(i, ElementStatus::Modified);
        }

        let mut done = Narrative::new("Done", "Prefix array complete.")
            .var("total", rec.elements[n - 1].value);

        if let Some((left, right)) = self.query {
            let before = if left == 0 {
                0
            } else {
                rec.elements[left - 1].value
            };
            let sum = rec.elements[right].value - before;
            rec.mark_all(ElementStatus::Default);
            rec.mark_range(left..=right, ElementStatus::Found);
            if left > 0 {
                rec.mark(left - 1, ElementStatus::Comparing);
            }
            rec.mark(right, ElementStatus::Pivot);
            rec.emit(
                EventKind::Accept,
                vec![left, right],
                Narrative::new(
                    format!("Query [{}, {}]", left, right),
                    if left == 0 {
                        format!("sum = P[{}] = {}.", right, sum)
                    } else {
                        format!("sum = P[{}] - P[{}] = {}.", right, left - 1, sum)
                    },
                )
                .var("left", left)
                .var("right", right)
                .var("sum", sum),
            );
            rec.clear_transient();
            rec.mark_range(left..=right, ElementStatus::Found);
            done = done.var("sum", sum);
        }

        rec.emit(EventKind::Done, Vec::new(), done);
        Ok(rec.finish())
    }
}
