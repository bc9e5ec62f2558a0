// Property checks for the generators and recorded sorts

use algoreplay::exec::{record, SortAlgorithm};
use algoreplay::snapshot::StepSequence;
use algoreplay::trace::{Generator, Kadane, PrefixSum, SegmentOp, SegmentTreeTrace};
use proptest::prelude::*;

fn same_width(seq: &StepSequence) -> bool {
    seq.iter().all(|s| s.elements.len() == seq.width())
}

fn best_subarray(values: &[i64]) -> i64 {
    let mut best = i64::MIN;
    for i in 0..values.len() {
        let mut sum = 0;
        for v in &values[i..] {
            sum += v;
            best = best.max(sum);
        }
    }
    best
}

proptest! {
    #[test]
    fn kadane_is_deterministic_and_optimal(values in prop::collection::vec(-50i64..50, 1..30)) {
        let first = Kadane::new(values.clone()).generate().unwrap();
        let second = Kadane::new(values.clone()).generate().unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(same_width(&first));
        let best = best_subarray(&values).to_string();
        prop_assert_eq!(first.last().variable("maxSoFar"), Some(best.as_str()));
    }

    #[test]
    fn prefix_sum_total_matches(values in prop::collection::vec(-100i64..100, 1..40)) {
        let seq = PrefixSum::new(values.clone()).generate().unwrap();
        prop_assert!(same_width(&seq));
        let total = values.iter().sum::<i64>().to_string();
        prop_assert_eq!(seq.last().variable("total"), Some(total.as_str()));
    }

    #[test]
    fn segment_tree_query_matches_slice_sum(
        values in prop::collection::vec(-100i64..100, 1..25),
        a in 0usize..25,
        b in 0usize..25,
    ) {
        let n = values.len();
        let (left, right) = ((a % n).min(b % n), (a % n).max(b % n));
        let seq = SegmentTreeTrace::new(values.clone(), SegmentOp::Query { left, right })
            .generate()
            .unwrap();
        prop_assert_eq!(seq.width(), 2 * n - 1);
        let expected = values[left..=right].iter().sum::<i64>().to_string();
        prop_assert_eq!(seq.last().variable("sum"), Some(expected.as_str()));
    }

    #[test]
    fn recorded_sorts_sort(values in prop::collection::vec(-1000i64..1000, 1..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let mut expected = values.clone();
        expected.sort();
        for alg in SortAlgorithm::ALL {
            let seq = runtime.block_on(record(&alg, &values)).unwrap();
            prop_assert!(same_width(&seq));
            prop_assert_eq!(seq.last().values(), expected.clone(), "{}", alg.id());
            for (i, snapshot) in seq.iter().enumerate() {
                prop_assert_eq!(snapshot.progress.current_step, i);
                prop_assert_eq!(snapshot.progress.total_steps, seq.len());
            }
        }
    }
}
