use std::hash::Hash;
use thiserror::Error;

/// Possible errors when running a batch with `batchfetch_lib`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The batch was started without a single identifier or target
    #[error("Cannot fetch an empty batch: no identifiers were given")]
    EmptyInput,
    /// An identifier was empty or consisted only of whitespace
    #[error("Identifier at position {position} is blank")]
    BlankIdentifier {
        /// Position of the offending identifier within the input
        position: usize,
    },
    /// No label could be recovered from the given target
    #[error("Cannot recover a label from target `{0}`")]
    UnlabelableTarget(String),
    /// The given string can not be parsed into a valid target URL
    #[error("Cannot parse `{0}` as a target URL")]
    InvalidTarget(String, #[source] url::ParseError),
    /// The request template cannot be used to build targets
    #[error("Invalid request template `{0}`")]
    InvalidTemplate(String),
    /// Concurrency limits must be positive
    #[error("Concurrency limit must be at least 1, got {0}")]
    InvalidConcurrency(usize),
    /// Reqwest network error
    #[error("Network error while trying to connect to an endpoint via reqwest")]
    NetworkRequest(#[source] reqwest::Error),
    /// The reqwest client could not be created
    #[error("Error creating request client: {0}")]
    BuildRequestClient(#[source] reqwest::Error),
    /// The admission gate was closed while a worker waited for a slot
    #[error("Admission gate closed while waiting for a slot")]
    GateClosed,
    /// An outcome was posted after the collector stopped listening
    #[error("Cannot post outcome: the collector is no longer listening")]
    CollectorClosed,
    /// Fewer outcomes arrived than workers were launched
    #[error("Expected {expected} outcomes but only {received} were collected")]
    MissingOutcomes {
        /// Number of launched workers
        expected: usize,
        /// Number of outcomes actually received
        received: usize,
    },
    /// More outcomes arrived than requests were made
    #[error("Expected {expected} outcomes but {received} were collected")]
    UnexpectedOutcomes {
        /// Number of requests in the batch
        expected: usize,
        /// Number of outcomes actually received
        received: usize,
    },
    /// Two outcomes claimed the same position
    #[error("More than one outcome for position {0}")]
    DuplicatePosition(usize),
    /// No outcome was collected for a position
    #[error("No outcome for position {0}")]
    MissingPosition(usize),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NetworkRequest(e1), Self::NetworkRequest(e2))
            | (Self::BuildRequestClient(e1), Self::BuildRequestClient(e2)) => {
                e1.to_string() == e2.to_string()
            }
            (Self::InvalidTarget(s1, e1), Self::InvalidTarget(s2, e2)) => s1 == s2 && e1 == e2,
            (Self::UnlabelableTarget(t1), Self::UnlabelableTarget(t2))
            | (Self::InvalidTemplate(t1), Self::InvalidTemplate(t2)) => t1 == t2,
            (Self::BlankIdentifier { position: p1 }, Self::BlankIdentifier { position: p2 })
            | (Self::DuplicatePosition(p1), Self::DuplicatePosition(p2))
            | (Self::MissingPosition(p1), Self::MissingPosition(p2))
            | (Self::InvalidConcurrency(p1), Self::InvalidConcurrency(p2)) => p1 == p2,
            (
                Self::MissingOutcomes {
                    expected: e1,
                    received: r1,
                },
                Self::MissingOutcomes {
                    expected: e2,
                    received: r2,
                },
            )
            | (
                Self::UnexpectedOutcomes {
                    expected: e1,
                    received: r1,
                },
                Self::UnexpectedOutcomes {
                    expected: e2,
                    received: r2,
                },
            ) => e1 == e2 && r1 == r2,
            (Self::EmptyInput, Self::EmptyInput)
            | (Self::GateClosed, Self::GateClosed)
            | (Self::CollectorClosed, Self::CollectorClosed) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

impl Hash for ErrorKind {
    fn hash<H>(&self, state: &mut H)
    where
        H: std::hash::Hasher,
    {
        match self {
            Self::NetworkRequest(e) | Self::BuildRequestClient(e) => e.to_string().hash(state),
            Self::InvalidTarget(s, e) => (s, e.to_string()).hash(state),
            Self::UnlabelableTarget(t) | Self::InvalidTemplate(t) => t.hash(state),
            Self::BlankIdentifier { position: p }
            | Self::DuplicatePosition(p)
            | Self::MissingPosition(p)
            | Self::InvalidConcurrency(p) => (std::mem::discriminant(self), p).hash(state),
            Self::MissingOutcomes { expected, received }
            | Self::UnexpectedOutcomes { expected, received } => {
                (std::mem::discriminant(self), expected, received).hash(state);
            }
            Self::EmptyInput | Self::GateClosed | Self::CollectorClosed => {
                std::mem::discriminant(self).hash(state);
            }
        }
    }
}

impl From<reqwest::Error> for ErrorKind {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkRequest(e)
    }
}
