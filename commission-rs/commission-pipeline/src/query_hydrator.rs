use crate::error::EvaluationResult;
use crate::util;

/// Query hydrators run before candidate fetching and enrich the query
/// object with additional context.
pub trait QueryHydrator<Q>
where
    Q: Clone,
{
    /// Decide if this query hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Returns a new query with this hydrator's fields populated.
    fn hydrate(&self, query: &Q) -> EvaluationResult<Q>;

    /// Update the query with the hydrated fields.
    /// Only the fields this hydrator is responsible for should be copied.
    fn update(&self, query: &mut Q, hydrated: Q);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
