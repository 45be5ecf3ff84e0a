use crate::error::EvaluationResult;
use crate::sales_loader::SalesRecord;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::EvaluationQuery;

/// Records which row was chosen so a disputed payout can be traced back to
/// the export line it came from.
pub struct EvaluationLogSideEffect;

impl SideEffect<EvaluationQuery, SalesRecord> for EvaluationLogSideEffect {
    fn run(&self, input: &SideEffectInput<'_, EvaluationQuery, SalesRecord>) -> EvaluationResult<()> {
        match input.selected_candidates.first() {
            Some(record) => log::info!(
                "request_id={} target={:?} selected row {} ({})",
                input.query.request_id,
                input.query.target,
                record.row,
                record.employee_name
            ),
            None => log::info!(
                "request_id={} target={:?} matched no rows",
                input.query.request_id,
                input.query.target
            ),
        }
        for warning in &input.query.warnings {
            log::warn!("request_id={} {}", input.query.request_id, warning);
        }
        Ok(())
    }
}
