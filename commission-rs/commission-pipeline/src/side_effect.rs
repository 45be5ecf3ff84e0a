use crate::error::EvaluationResult;
use crate::util;

/// Input provided to side effects after the pipeline completes selection.
pub struct SideEffectInput<'a, Q, C> {
    pub query: &'a Q,
    pub selected_candidates: &'a [C],
}

/// A side effect runs after selection and does not affect the pipeline
/// result. A failing side effect is logged and otherwise ignored.
pub trait SideEffect<Q, C>
where
    Q: Clone,
    C: Clone,
{
    /// Decide if this side effect should run.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Execute the side effect.
    fn run(&self, input: &SideEffectInput<'_, Q, C>) -> EvaluationResult<()>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
