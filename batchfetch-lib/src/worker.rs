//! A single fetch of a batch: gate, transport call, post.

use std::{fmt, sync::Arc};

use log::debug;

use crate::collector::Poster;
use crate::gate::Gate;
use crate::transport::Transport;
use crate::{Outcome, Request, Result, Status};

/// Performs exactly one fetch of a batch.
///
/// A worker is spawned per request. It waits for a slot at the gate, issues
/// one call through the transport, tags whatever came back with the position
/// and label of its request and hands the outcome to the collector. The gate
/// slot is held for the whole sequence, including the post.
pub struct Worker<T: Transport> {
    transport: Arc<T>,
    gate: Gate,
    poster: Poster<T::Response, T::Error>,
}

impl<T: Transport> fmt::Debug for Worker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Worker<T> {
    /// Create a new worker sharing `transport` and `gate` with its siblings
    pub const fn new(transport: Arc<T>, gate: Gate, poster: Poster<T::Response, T::Error>) -> Self {
        Worker {
            transport,
            gate,
            poster,
        }
    }

    /// Run the fetch for `request` and post its outcome.
    ///
    /// A transport failure is not an error of the worker: it is recorded in
    /// the outcome as [`Status::Failure`].
    ///
    /// # Errors
    ///
    /// Fails if the gate was closed or the collector is gone, in which case
    /// no outcome is posted.
    pub async fn run(self, request: Request) -> Result<()> {
        let _permit = self.gate.acquire().await?;
        debug!(
            "Fetching {request} ({} of {} slots in use)",
            self.gate.in_use(),
            self.gate.limit()
        );

        let status = Status::from(self.transport.fetch(&request.target).await);
        let outcome = Outcome::new(request.position, request.label, status);
        debug!("Finished {outcome}");

        self.poster.post(outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Collector;
    use crate::{ErrorKind, Label};
    use async_trait::async_trait;
    use url::Url;

    /// Echoes the target back, or refuses if the path says so
    #[derive(Debug)]
    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        type Response = String;
        type Error = String;

        async fn fetch(&self, target: &Url) -> std::result::Result<String, String> {
            if target.path() == "/refuse" {
                Err("connection refused".to_string())
            } else {
                Ok(target.to_string())
            }
        }
    }

    fn request(position: usize, target: &str) -> Request {
        Request::new(
            position,
            Label::from(format!("AS{position}")),
            Url::parse(target).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_posts_tagged_outcome() {
        let gate = Gate::new(1).unwrap();
        let (collector, poster) = Collector::new(1, 1);
        let worker = Worker::new(Arc::new(EchoTransport), gate.clone(), poster);

        worker.run(request(7, "https://example.com/ok")).await.unwrap();

        let outcomes = collector.collect().await.unwrap();
        assert_eq!(outcomes[0].position, 7);
        assert_eq!(outcomes[0].label.as_str(), "AS7");
        assert_eq!(
            outcomes[0].status.response().map(String::as_str),
            Some("https://example.com/ok")
        );
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_failure_status() {
        let gate = Gate::new(1).unwrap();
        let (collector, poster) = Collector::new(1, 1);
        let worker = Worker::new(Arc::new(EchoTransport), gate.clone(), poster);

        worker
            .run(request(0, "https://example.com/refuse"))
            .await
            .unwrap();

        let outcomes = collector.collect().await.unwrap();
        assert_eq!(
            outcomes[0].status.error().map(String::as_str),
            Some("connection refused")
        );
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_slot_released_when_collector_is_gone() {
        let gate = Gate::new(1).unwrap();
        let (collector, poster) = Collector::<String, String>::new(1, 1);
        drop(collector);
        let worker = Worker::new(Arc::new(EchoTransport), gate.clone(), poster);

        let error = worker
            .run(request(0, "https://example.com/ok"))
            .await
            .unwrap_err();
        assert_eq!(error, ErrorKind::CollectorClosed);
        assert_eq!(gate.available(), 1);
    }
}
