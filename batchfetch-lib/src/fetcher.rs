//! Orchestration of one batch: fan-out through the gate, fan-in through the
//! collector, then reordering.
//!
//! ```text
//! requests ──► Worker ─┐                ┌──────────┐
//!          ──► Worker ─┼─ Gate (k) ───► │Collector │ ──► reorder ──► Batch
//!          ──► Worker ─┘                └──────────┘
//! ```

use std::fmt::Display;
use std::sync::Arc;

use log::{debug, warn};

use crate::collector::Collector;
use crate::gate::Gate;
use crate::reorder::reorder;
use crate::transport::Transport;
use crate::worker::Worker;
use crate::{Batch, ErrorKind, Requests, Result};

/// Lifecycle of a single [`Fetcher::fetch_all`] invocation.
///
/// States only move forward; there is no retry or cancellation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Requests validated, nothing launched yet
    Idle,
    /// Workers are being spawned
    Launching,
    /// Every worker is spawned, waiting for all outcomes to arrive
    AwaitingCompletions,
    /// All outcomes arrived, restoring request order
    Reordering,
    /// The ordered batch was handed to the caller
    Done,
}

impl BatchState {
    /// The state following this one. `Done` is final.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            BatchState::Idle => BatchState::Launching,
            BatchState::Launching => BatchState::AwaitingCompletions,
            BatchState::AwaitingCompletions => BatchState::Reordering,
            BatchState::Reordering | BatchState::Done => BatchState::Done,
        }
    }

    fn advance(&mut self) {
        let next = self.next();
        debug!("Batch state: {self} -> {next}");
        *self = next;
    }
}

impl Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BatchState::Idle => "idle",
            BatchState::Launching => "launching",
            BatchState::AwaitingCompletions => "awaiting completions",
            BatchState::Reordering => "reordering",
            BatchState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Fetches batches of requests with a bounded number of concurrent calls.
///
/// The fetcher itself holds no per-batch state: every call to
/// [`Fetcher::fetch_all`] creates its own gate and collector, so batches
/// running at the same time never interfere.
#[derive(Debug)]
pub struct Fetcher<T: Transport> {
    transport: Arc<T>,
    max_concurrency: usize,
}

// Derived `Clone` would require `T: Clone`
impl<T: Transport> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Fetcher {
            transport: Arc::clone(&self.transport),
            max_concurrency: self.max_concurrency,
        }
    }
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher running at most `max_concurrency` calls of
    /// `transport` at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConcurrency`] if `max_concurrency` is zero.
    pub fn new(transport: T, max_concurrency: usize) -> Result<Self> {
        if max_concurrency == 0 {
            return Err(ErrorKind::InvalidConcurrency(max_concurrency));
        }
        Ok(Fetcher {
            transport: Arc::new(transport),
            max_concurrency,
        })
    }

    /// Maximum number of concurrent transport calls
    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// The shared transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every request and return the outcomes in request order.
    ///
    /// One task is spawned per request; the gate keeps at most
    /// `max_concurrency` of them inside the transport. Transport failures
    /// end up in the batch as failed outcomes and never abort it.
    ///
    /// # Errors
    ///
    /// Only defects of the batch machinery itself are returned: a worker
    /// that died without reporting ([`ErrorKind::MissingOutcomes`]) or
    /// collected positions that do not line up with the requests
    /// ([`ErrorKind::DuplicatePosition`], [`ErrorKind::MissingPosition`]).
    pub async fn fetch_all(&self, requests: Requests) -> Result<Batch<T::Response, T::Error>> {
        let mut state = BatchState::Idle;
        let expected = requests.len();
        let gate = Gate::new(self.max_concurrency)?;
        let (collector, poster) = Collector::new(expected, self.max_concurrency);

        state.advance();
        for request in requests {
            let position = request.position;
            let worker = Worker::new(Arc::clone(&self.transport), gate.clone(), poster.clone());
            tokio::spawn(async move {
                if let Err(e) = worker.run(request).await {
                    warn!("Worker for #{position} stopped without an outcome: {e}");
                }
            });
        }
        // The collector only sees the end of the channel once every worker
        // dropped its poster
        drop(poster);
        debug!(
            "Launched {} workers, at most {} in flight",
            collector.expected(),
            gate.limit()
        );

        state.advance();
        let outcomes = collector.collect().await?;

        state.advance();
        let batch = reorder(outcomes, expected)?;

        state.advance();
        debug_assert_eq!(state, BatchState::Done);
        Ok(batch)
    }
}
