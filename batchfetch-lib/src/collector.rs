//! Fan-in of worker outcomes.
//!
//! A [`Collector`] owns the receiving end of a bounded channel and knows how
//! many outcomes to expect. Workers hold a [`Poster`] each (a clone of the
//! sending end). [`Collector::collect`] is the synchronization barrier of a
//! batch: it only returns once every launched worker has reported.

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::{ErrorKind, Outcome, Result};

/// Receiving side of the completion channel of one batch
#[derive(Debug)]
pub struct Collector<R, E = ErrorKind> {
    rx: mpsc::Receiver<Outcome<R, E>>,
    expected: usize,
}

/// Sending side of the completion channel, one clone per worker
#[derive(Debug)]
pub struct Poster<R, E = ErrorKind> {
    tx: mpsc::Sender<Outcome<R, E>>,
}

// Derived `Clone` would require `R: Clone` and `E: Clone`
impl<R, E> Clone for Poster<R, E> {
    fn clone(&self) -> Self {
        Poster {
            tx: self.tx.clone(),
        }
    }
}

impl<R, E> Collector<R, E> {
    /// Create a collector expecting `expected` outcomes.
    ///
    /// `capacity` bounds the number of outcomes buffered in the channel
    /// before posting workers have to wait. A capacity of zero is bumped to
    /// one, as tokio channels need room for at least one message.
    #[must_use]
    pub fn new(expected: usize, capacity: usize) -> (Self, Poster<R, E>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Collector { rx, expected }, Poster { tx })
    }

    /// Number of outcomes this collector waits for
    #[must_use]
    pub const fn expected(&self) -> usize {
        self.expected
    }

    /// Wait for all outcomes and return them in arrival order.
    ///
    /// The collector must not hold a [`Poster`] itself; once all posters are
    /// gone and not every outcome arrived, waiting any longer would block
    /// forever, so the shortfall is reported instead.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingOutcomes`] if all posters were dropped
    /// before `expected` outcomes were received.
    pub async fn collect(mut self) -> Result<Vec<Outcome<R, E>>> {
        let mut outcomes = Vec::with_capacity(self.expected);
        while outcomes.len() < self.expected {
            match self.rx.recv().await {
                Some(outcome) => {
                    debug!(
                        "Collected #{} {} ({}/{})",
                        outcome.position,
                        outcome.label,
                        outcomes.len() + 1,
                        self.expected
                    );
                    outcomes.push(outcome);
                }
                None => {
                    warn!(
                        "All workers finished, but only {} of {} outcomes arrived",
                        outcomes.len(),
                        self.expected
                    );
                    return Err(ErrorKind::MissingOutcomes {
                        expected: self.expected,
                        received: outcomes.len(),
                    });
                }
            }
        }
        Ok(outcomes)
    }
}

impl<R, E> Poster<R, E> {
    /// Hand an outcome over to the collector, waiting for channel capacity
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CollectorClosed`] if the collector is gone.
    pub async fn post(&self, outcome: Outcome<R, E>) -> Result<()> {
        self.tx
            .send(outcome)
            .await
            .map_err(|_| ErrorKind::CollectorClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, Status};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn outcome(position: usize) -> Outcome<(), String> {
        Outcome::new(
            position,
            Label::from(format!("A{position}")),
            Status::Success(()),
        )
    }

    #[tokio::test]
    async fn test_collects_in_arrival_order() {
        let (collector, poster) = Collector::new(3, 1);
        for position in [2, 0, 1] {
            let poster = poster.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10 * position as u64)).await;
                poster.post(outcome(position)).await.unwrap();
            });
        }
        drop(poster);

        let arrived: Vec<_> = collector
            .collect()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.position)
            .collect();
        assert_eq!(arrived, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_blocks_until_every_outcome_arrived() {
        let (collector, poster) = Collector::<(), String>::new(2, 2);
        assert_eq!(collector.expected(), 2);
        poster.post(outcome(0)).await.unwrap();

        let collect = tokio::spawn(collector.collect());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!collect.is_finished());

        poster.post(outcome(1)).await.unwrap();
        let outcomes = collect.await.unwrap().unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_reports_missing_outcomes() {
        let (collector, poster) = Collector::<(), String>::new(3, 4);
        poster.post(outcome(0)).await.unwrap();
        poster.post(outcome(1)).await.unwrap();
        drop(poster);

        assert_eq!(
            collector.collect().await.unwrap_err(),
            ErrorKind::MissingOutcomes {
                expected: 3,
                received: 2
            }
        );
    }

    #[tokio::test]
    async fn test_post_after_collector_dropped() {
        let (collector, poster) = Collector::<(), String>::new(1, 1);
        drop(collector);
        assert_eq!(
            poster.post(outcome(0)).await.unwrap_err(),
            ErrorKind::CollectorClosed
        );
    }

    #[tokio::test]
    async fn test_many_concurrent_posters() {
        let (collector, poster) = Collector::new(100, 4);
        for position in 0..100 {
            let poster = poster.clone();
            tokio::spawn(async move { poster.post(outcome(position)).await.unwrap() });
        }
        drop(poster);

        let mut positions: Vec<_> = collector
            .collect()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.position)
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..100).collect::<Vec<_>>());
    }
}
