use std::ops::Index;

use crate::{ErrorKind, Outcome};

/// The ordered result of one batch.
///
/// Contains exactly one [`Outcome`] per request, and `batch[i].position == i`
/// holds for every index. A `Batch` can only be created by the reorderer, so
/// this invariant is checked once and never has to be re-validated.
/// It cannot be modified, only read or consumed.
#[derive(Debug)]
pub struct Batch<R, E = ErrorKind> {
    outcomes: Vec<Outcome<R, E>>,
}

impl<R, E> Batch<R, E> {
    pub(crate) const fn from_ordered(outcomes: Vec<Outcome<R, E>>) -> Self {
        Batch { outcomes }
    }

    /// Number of outcomes, equal to the number of requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always `false` for a batch built by [`reorder`](fn@crate::reorder)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate over the outcomes in request order
    pub fn iter(&self) -> std::slice::Iter<'_, Outcome<R, E>> {
        self.outcomes.iter()
    }

    /// Number of outcomes with a response
    #[must_use]
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of outcomes with a transport error
    #[must_use]
    pub fn failures(&self) -> usize {
        self.len() - self.successes()
    }

    /// Hand all outcomes (and thereby their response bodies) to the caller
    #[must_use]
    pub fn into_outcomes(self) -> Vec<Outcome<R, E>> {
        self.outcomes
    }
}

impl<R, E> Index<usize> for Batch<R, E> {
    type Output = Outcome<R, E>;

    fn index(&self, position: usize) -> &Self::Output {
        &self.outcomes[position]
    }
}

impl<R, E> IntoIterator for Batch<R, E> {
    type Item = Outcome<R, E>;
    type IntoIter = std::vec::IntoIter<Outcome<R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a, R, E> IntoIterator for &'a Batch<R, E> {
    type Item = &'a Outcome<R, E>;
    type IntoIter = std::slice::Iter<'a, Outcome<R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
