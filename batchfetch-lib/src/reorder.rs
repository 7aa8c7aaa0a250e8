//! Restores request order after the collector gathered outcomes in
//! completion order.

use log::error;

use crate::{Batch, ErrorKind, Outcome, Result};

/// Sort collected outcomes by position and check that there is exactly one
/// outcome for every position in `0..expected`.
///
/// Positions are unique by construction, so the sort is a total order on a
/// single integer key. If that invariant is ever broken, the defect is
/// reported rather than papered over by dropping or padding outcomes.
///
/// # Errors
///
/// - [`ErrorKind::MissingOutcomes`] if fewer than `expected` outcomes were collected
/// - [`ErrorKind::UnexpectedOutcomes`] if more than `expected` outcomes were collected
/// - [`ErrorKind::DuplicatePosition`] if two outcomes share a position
/// - [`ErrorKind::MissingPosition`] if a position in `0..expected` has no outcome
pub fn reorder<R, E>(mut outcomes: Vec<Outcome<R, E>>, expected: usize) -> Result<Batch<R, E>> {
    outcomes.sort_by_key(|outcome| outcome.position);

    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.position == index {
            continue;
        }
        // Sorted, so the first position that does not match its index is
        // either a repeat of its predecessor or runs ahead of a gap
        if index > 0 && outcomes[index - 1].position == outcome.position {
            error!("Outcome #{} was collected twice", outcome.position);
            return Err(ErrorKind::DuplicatePosition(outcome.position));
        }
        error!("No outcome was collected for #{index}");
        return Err(ErrorKind::MissingPosition(index));
    }

    if outcomes.len() != expected {
        error!(
            "Collected {} outcomes for a batch of {expected}",
            outcomes.len()
        );
        let received = outcomes.len();
        return Err(if received < expected {
            ErrorKind::MissingOutcomes { expected, received }
        } else {
            ErrorKind::UnexpectedOutcomes { expected, received }
        });
    }

    Ok(Batch::from_ordered(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, Status};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn outcome(position: usize) -> Outcome<usize, String> {
        Outcome::new(
            position,
            Label::from(format!("A{position}")),
            Status::Success(position),
        )
    }

    fn positions<R, E>(batch: &Batch<R, E>) -> Vec<usize> {
        batch.iter().map(|o| o.position).collect()
    }

    #[rstest]
    #[case(vec![2, 0, 1])]
    #[case(vec![0, 1, 2])]
    #[case(vec![2, 1, 0])]
    #[case(vec![1, 2, 0])]
    fn test_restores_request_order(#[case] arrival: Vec<usize>) {
        let collected = arrival.into_iter().map(outcome).collect();
        let batch = reorder(collected, 3).unwrap();
        assert_eq!(positions(&batch), vec![0, 1, 2]);
        assert_eq!(batch[1].label.as_str(), "A1");
    }

    #[test]
    fn test_reordering_is_idempotent() {
        let collected = [4, 0, 3, 1, 2].into_iter().map(outcome).collect();
        let once = reorder(collected, 5).unwrap();
        let expected = positions(&once);

        let twice = reorder(once.into_outcomes(), 5).unwrap();
        assert_eq!(positions(&twice), expected);
        let labels: Vec<_> = twice.iter().map(|o| o.label.to_string()).collect();
        assert_eq!(labels, vec!["A0", "A1", "A2", "A3", "A4"]);
    }

    #[test]
    fn test_duplicate_position_is_a_defect() {
        let collected = [1, 0, 1].into_iter().map(outcome).collect();
        assert_eq!(
            reorder(collected, 3).unwrap_err(),
            ErrorKind::DuplicatePosition(1)
        );
    }

    #[rstest]
    #[case(vec![0, 2], 3, ErrorKind::MissingPosition(1))]
    #[case(vec![1, 2], 3, ErrorKind::MissingPosition(0))]
    #[case(vec![0, 1], 3, ErrorKind::MissingOutcomes { expected: 3, received: 2 })]
    #[case(vec![0, 1, 2], 2, ErrorKind::UnexpectedOutcomes { expected: 2, received: 3 })]
    #[case(vec![3], 1, ErrorKind::MissingPosition(0))]
    fn test_gaps_are_not_masked(
        #[case] arrival: Vec<usize>,
        #[case] expected: usize,
        #[case] error: ErrorKind,
    ) {
        let collected = arrival.into_iter().map(outcome).collect();
        assert_eq!(reorder(collected, expected).unwrap_err(), error);
    }

    #[test]
    fn test_counts() {
        let collected = vec![
            outcome(1),
            Outcome::new(0, Label::from("A0"), Status::Failure("refused".to_string())),
            outcome(2),
        ];
        let batch = reorder(collected, 3).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
        assert_eq!(batch.successes(), 2);
        assert_eq!(batch.failures(), 1);
        assert!(batch[0].status.is_failure());
    }
}
