use crate::error::EvaluationResult;
use crate::util;

/// Result of a filter operation, partitioning candidates into kept and removed.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters run sequentially and partition candidates into kept and removed sets.
pub trait Filter<Q, C>
where
    Q: Clone,
    C: Clone,
{
    /// Decide if this filter should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Kept candidates continue to the next stage; removed candidates are
    /// reported on the pipeline result but take no further part.
    fn filter(&self, query: &Q, candidates: Vec<C>) -> EvaluationResult<FilterResult<C>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
