use std::cmp::Ordering;

use crate::util;

/// Selectors rank candidates and keep the best ones.
pub trait Selector<Q, C>
where
    Q: Clone,
    C: Clone,
{
    /// Default selection: sort and truncate based on provided configs.
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Decide if this selector should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Extract the score from a candidate to use for sorting.
    fn score(&self, candidate: &C) -> f64;

    /// Sort candidates by score, highest first.
    ///
    /// The sort is stable and NaN scores go last, so equal or unscorable
    /// candidates keep their input order.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let sa = self.score(a);
            let sb = self.score(b);
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
            }
        });
        sorted
    }

    /// Optionally provide a maximum number of candidates to select.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
