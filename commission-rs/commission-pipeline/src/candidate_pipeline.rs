//! Generic staged pipeline.
//!
//! Stages run strictly in order on the calling thread:
//! query hydrators → sources → filters → selector → side effects.
//! Any stage error aborts the run except side effects, which only log.

use crate::error::EvaluationResult;
use crate::filter::{Filter, FilterResult};
use crate::query_hydrator::QueryHydrator;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id so every log line can be correlated.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a pipeline run produced, stage by stage.
#[derive(Clone, Debug)]
pub struct PipelineResult<Q, C> {
    /// The query after hydration.
    pub query: Q,
    pub retrieved_candidates: Vec<C>,
    pub filtered_candidates: Vec<C>,
    pub selected_candidates: Vec<C>,
}

pub trait CandidatePipeline<Q, C>
where
    Q: Clone + HasRequestId,
    C: Clone,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn side_effects(&self) -> &[Box<dyn SideEffect<Q, C>>];

    /// Run every stage for one query.
    fn execute(&self, query: Q) -> EvaluationResult<PipelineResult<Q, C>> {
        let query = self.hydrate_query(query)?;

        let mut retrieved = Vec::new();
        for source in self.sources().iter().filter(|s| s.enable(&query)) {
            let candidates = source.get_candidates(&query)?;
            log::debug!(
                "request_id={} source={} fetched {} candidates",
                query.request_id(),
                source.name(),
                candidates.len()
            );
            retrieved.extend(candidates);
        }

        let mut kept = retrieved.clone();
        let mut removed = Vec::new();
        for filter in self.filters().iter().filter(|f| f.enable(&query)) {
            let FilterResult { kept: k, removed: r } = filter.filter(&query, kept)?;
            log::debug!(
                "request_id={} filter={} kept {} removed {}",
                query.request_id(),
                filter.name(),
                k.len(),
                r.len()
            );
            kept = k;
            removed.extend(r);
        }

        let selector = self.selector();
        let selected = if selector.enable(&query) {
            selector.select(&query, kept)
        } else {
            kept
        };

        self.run_side_effects(&query, &selected);

        Ok(PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: removed,
            selected_candidates: selected,
        })
    }

    /// Apply every enabled query hydrator in order.
    fn hydrate_query(&self, query: Q) -> EvaluationResult<Q> {
        let mut query = query;
        for hydrator in self.query_hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            let hydrated = hydrator.hydrate(&query)?;
            hydrator.update(&mut query, hydrated);
        }
        Ok(query)
    }

    fn run_side_effects(&self, query: &Q, selected: &[C]) {
        let input = SideEffectInput {
            query,
            selected_candidates: selected,
        };
        for side_effect in self.side_effects().iter().filter(|s| s.enable(query)) {
            if let Err(e) = side_effect.run(&input) {
                log::warn!(
                    "request_id={} side_effect={} failed: {}",
                    query.request_id(),
                    side_effect.name(),
                    e
                );
            }
        }
    }
}
