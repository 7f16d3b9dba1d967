//! Visible subset and random pick.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::QuoteError;
use crate::models::{CategoryFilter, Quote};

/// Quotes eligible for display under `filter`, in collection order.
/// An empty result is a normal outcome ("no quotes in this category").
pub fn visible_set<'a>(all: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    all.iter().filter(|q| filter.matches(&q.category)).collect()
}

/// Uniformly random element of `subset`.
pub fn pick_random<'a, T, R>(subset: &'a [T], rng: &mut R) -> Result<&'a T, QuoteError>
where
    R: Rng + ?Sized,
{
    subset.choose(rng).ok_or(QuoteError::EmptySelection)
}

pub fn pick_random_thread_rng<T>(subset: &[T]) -> Result<&T, QuoteError> {
    pick_random(subset, &mut rand::rng())
}
