use crate::error::EvaluationResult;
use crate::util;

/// Sources produce the raw candidate set for a query.
pub trait Source<Q, C>
where
    Q: Clone,
    C: Clone,
{
    /// Decide if this source should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Fetch candidates for the given query.
    fn get_candidates(&self, query: &Q) -> EvaluationResult<Vec<C>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
