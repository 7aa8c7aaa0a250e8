use std::fmt::Display;

use crate::{ErrorKind, Label};

/// Result of a single fetch: either the transport's response or its error.
///
/// The response is handed over untouched. For HTTP transports this means
/// the body is still unread and it is up to the consumer to drain it.
#[derive(Debug)]
pub enum Status<R, E = ErrorKind> {
    /// The transport returned a response (of any HTTP status)
    Success(R),
    /// The transport failed to produce a response
    Failure(E),
}

impl<R, E> Status<R, E> {
    /// Returns `true` if the transport produced a response
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Status::Success(_))
    }

    /// Returns `true` if the transport failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Status::Failure(_))
    }

    /// Borrow the response, if any
    #[must_use]
    pub const fn response(&self) -> Option<&R> {
        match self {
            Status::Success(r) => Some(r),
            Status::Failure(_) => None,
        }
    }

    /// Borrow the error, if any
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Status::Success(_) => None,
            Status::Failure(e) => Some(e),
        }
    }

    /// Convert into a standard [`Result`]
    pub fn into_result(self) -> Result<R, E> {
        match self {
            Status::Success(r) => Ok(r),
            Status::Failure(e) => Err(e),
        }
    }
}

impl<R, E> From<Result<R, E>> for Status<R, E> {
    fn from(result: Result<R, E>) -> Self {
        match result {
            Ok(r) => Status::Success(r),
            Err(e) => Status::Failure(e),
        }
    }
}

/// The tagged result of one worker: where it came from and what happened
#[derive(Debug)]
pub struct Outcome<R, E = ErrorKind> {
    /// Position of the originating request
    pub position: usize,
    /// Label of the originating request
    pub label: Label,
    /// What the transport returned
    pub status: Status<R, E>,
}

impl<R, E> Outcome<R, E> {
    /// Create a new outcome
    #[inline]
    #[must_use]
    pub const fn new(position: usize, label: Label, status: Status<R, E>) -> Self {
        Outcome {
            position,
            label,
            status,
        }
    }

    /// Returns `true` if the fetch produced a response
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl<R, E: Display> Display for Outcome<R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.status {
            Status::Success(_) => write!(f, "#{} {} ok", self.position, self.label),
            Status::Failure(e) => write!(f, "#{} {} failed: {e}", self.position, self.label),
        }
    }
}
