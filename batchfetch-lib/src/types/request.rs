use std::{fmt::Display, ops::Deref};

use serde::Serialize;
use url::Url;

use crate::types::target::parse_target;
use crate::{ErrorKind, Result, Template};

/// Correlation key of a request, recovered from its target
/// (for example the AS number of a RIPEstat query).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// The label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single fetch of a batch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    /// Zero-based index of this request within the batch input
    pub position: usize,
    /// Correlation key recovered from the target
    pub label: Label,
    /// The URL to fetch
    pub target: Url,
}

impl Request {
    /// Instantiate a new `Request` object
    #[inline]
    #[must_use]
    pub const fn new(position: usize, label: Label, target: Url) -> Self {
        Request {
            position,
            label,
            target,
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({})", self.position, self.label, self.target)
    }
}

/// The validated input of one batch.
///
/// Holds at least one request; positions are `0..len` in order.
/// All input defects (no input, blank identifiers, targets without a label)
/// are rejected while building this type, so no worker is ever launched for
/// a batch with bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requests(Vec<Request>);

impl Requests {
    /// Build requests from identifiers by rendering each through `template`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::EmptyInput`] if there are no identifiers
    /// - [`ErrorKind::BlankIdentifier`] if an identifier is empty or whitespace
    /// - [`ErrorKind::InvalidTarget`] if a rendered target is not a valid URL
    pub fn from_identifiers<I, S>(identifiers: I, template: &Template) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets = Vec::new();
        for (position, identifier) in identifiers.into_iter().enumerate() {
            let identifier = identifier.as_ref();
            if identifier.trim().is_empty() {
                return Err(ErrorKind::BlankIdentifier { position });
            }
            targets.push(template.render(identifier));
        }
        Self::from_targets(targets, template)
    }

    /// Build requests from already rendered targets, recovering each label
    /// through `template`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::EmptyInput`] if there are no targets
    /// - [`ErrorKind::UnlabelableTarget`] if a target carries no label
    /// - [`ErrorKind::InvalidTarget`] if a target is not a valid URL
    pub fn from_targets<I, S>(targets: I, template: &Template) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requests = targets
            .into_iter()
            .enumerate()
            .map(|(position, target)| {
                let target = target.as_ref();
                let label = template.label(target)?;
                Ok(Request::new(position, label, parse_target(target)?))
            })
            .collect::<Result<Vec<_>>>()?;

        if requests.is_empty() {
            return Err(ErrorKind::EmptyInput);
        }
        Ok(Requests(requests))
    }
}

impl Deref for Requests {
    type Target = [Request];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Requests {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
