//! Admission gate bounding the number of fetches in flight.
//!
//! The gate is a thin wrapper around a [`tokio::sync::Semaphore`] with a
//! fixed number of permits. Tokio's semaphore is fair: waiters are admitted
//! in the order they called [`Gate::acquire`], so no worker starves as long
//! as every granted [`Permit`] is eventually dropped.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{ErrorKind, Result};

/// Counting limiter shared by the workers of one batch
#[derive(Debug, Clone)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

/// A slot granted by a [`Gate`].
///
/// The slot is returned when the permit is dropped, which covers every way
/// out of the protected section: normal return, early return through `?`,
/// and unwinding after a panic.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl Gate {
    /// Create a gate admitting at most `limit` concurrent holders.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConcurrency`] if `limit` is zero, or
    /// exceeds what the underlying semaphore supports.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 || limit > Semaphore::MAX_PERMITS {
            return Err(ErrorKind::InvalidConcurrency(limit));
        }
        Ok(Gate {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    /// Wait until a slot is free and take it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::GateClosed`] if the gate was closed while waiting.
    pub async fn acquire(&self) -> Result<Permit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| ErrorKind::GateClosed)?;
        Ok(Permit { _permit: permit })
    }

    /// The fixed number of slots of this gate
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of slots currently free
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Number of slots currently held
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.limit - self.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_zero_limit_is_rejected() {
        assert_eq!(Gate::new(0).unwrap_err(), ErrorKind::InvalidConcurrency(0));
    }

    #[tokio::test]
    async fn test_never_grants_more_than_limit() {
        let gate = Gate::new(2).unwrap();
        let first = gate.acquire().await.unwrap();
        let _second = gate.acquire().await.unwrap();
        assert_eq!(gate.available(), 0);
        assert_eq!(gate.in_use(), 2);

        // A third worker has to wait
        assert!(
            timeout(Duration::from_millis(50), gate.acquire())
                .await
                .is_err()
        );

        drop(first);
        let third = timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_permit_released_on_early_return() {
        async fn fails_while_holding(gate: &Gate) -> Result<()> {
            let _permit = gate.acquire().await?;
            Err(ErrorKind::CollectorClosed)
        }

        let gate = Gate::new(1).unwrap();
        assert!(fails_while_holding(&gate).await.is_err());
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_permit_released_on_panic() {
        let gate = Gate::new(1).unwrap();
        let worker_gate = gate.clone();
        let handle = tokio::spawn(async move {
            let _permit = worker_gate.acquire().await.unwrap();
            if worker_gate.available() == 0 {
                panic!("worker blew up while holding a slot");
            }
        });
        assert!(handle.await.unwrap_err().is_panic());
        assert_eq!(gate.available(), 1);
        assert!(
            timeout(Duration::from_millis(50), gate.acquire())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_waiters_are_admitted_in_order() {
        let gate = Gate::new(1).unwrap();
        let held = gate.acquire().await.unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for id in 0..3 {
            let gate = gate.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let _permit = gate.acquire().await.unwrap();
                tx.send(id).unwrap();
            });
            // Let the task queue up before spawning the next one
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        drop(tx);
        drop(held);

        let mut admitted = vec![];
        while let Some(id) = rx.recv().await {
            admitted.push(id);
        }
        assert_eq!(admitted, vec![0, 1, 2]);
    }
}
