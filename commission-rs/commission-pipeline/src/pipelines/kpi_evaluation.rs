use commission_kpi::{combine_activations, derive_commission, evaluate, format_rate, KpiInputs};

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::activation_query_hydrator::{ActivationQueryHydrator, SecondarySource};
use crate::components::employee_name_filter::EmployeeNameFilter;
use crate::components::evaluation_log_side_effect::EvaluationLogSideEffect;
use crate::components::latest_record_selector::LatestRecordSelector;
use crate::components::sales_record_source::SalesRecordSource;
use crate::error::{EvaluationError, EvaluationResult};
use crate::filter::Filter;
use crate::query_hydrator::QueryHydrator;
use crate::sales_loader::{SalesRecord, SalesTable};
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{ActivationSource, EvaluationQuery, EvaluationReport, EvaluationSettings};

/// The single-employee KPI evaluation pipeline.
///
/// Pipeline flow:
/// 1. ActivationQueryHydrator resolves activations when the export lacks them
/// 2. SalesRecordSource serves every export row
/// 3. EmployeeNameFilter keeps rows matching the target name
/// 4. LatestRecordSelector keeps the last matching row
/// 5. EvaluationLogSideEffect logs the chosen row and any warnings
///
/// `evaluate` then scores the chosen row against the KPI thresholds and
/// derives the commission.
pub struct KpiEvaluationPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<EvaluationQuery>>>,
    sources: Vec<Box<dyn Source<EvaluationQuery, SalesRecord>>>,
    filters: Vec<Box<dyn Filter<EvaluationQuery, SalesRecord>>>,
    selector: LatestRecordSelector,
    side_effects: Vec<Box<dyn SideEffect<EvaluationQuery, SalesRecord>>>,
    export_has_activations: bool,
    settings: EvaluationSettings,
}

impl KpiEvaluationPipeline {
    /// Build a pipeline over a loaded export with no secondary workbook.
    pub fn new(table: SalesTable, settings: EvaluationSettings) -> Self {
        Self::with_secondary(table, SecondarySource::NotProvided, settings)
    }

    /// Build a pipeline over a loaded export and an optional activation workbook.
    pub fn with_secondary(
        table: SalesTable,
        secondary: SecondarySource,
        settings: EvaluationSettings,
    ) -> Self {
        let export_has_activations = table.has_activation_columns;

        let query_hydrators: Vec<Box<dyn QueryHydrator<EvaluationQuery>>> =
            vec![Box::new(ActivationQueryHydrator::new(
                export_has_activations,
                secondary,
                settings.thresholds.activations,
            ))];

        let sources: Vec<Box<dyn Source<EvaluationQuery, SalesRecord>>> =
            vec![Box::new(SalesRecordSource::new(table.records))];

        let filters: Vec<Box<dyn Filter<EvaluationQuery, SalesRecord>>> =
            vec![Box::new(EmployeeNameFilter)];

        let side_effects: Vec<Box<dyn SideEffect<EvaluationQuery, SalesRecord>>> =
            vec![Box::new(EvaluationLogSideEffect)];

        Self {
            query_hydrators,
            sources,
            filters,
            selector: LatestRecordSelector,
            side_effects,
            export_has_activations,
            settings,
        }
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Select the target's latest row, evaluate all four KPIs and derive
    /// the commission.
    pub fn evaluate(&self, query: EvaluationQuery) -> EvaluationResult<EvaluationReport> {
        let result = self.execute(query)?;
        let query = result.query;

        let matched_rows = result.retrieved_candidates.len() - result.filtered_candidates.len();
        let record = result
            .selected_candidates
            .into_iter()
            .next()
            .ok_or_else(|| EvaluationError::NoMatch {
                target: query.target.clone(),
            })?;

        let (activations, activation_source) = if self.export_has_activations {
            (
                combine_activations(record.fwa_activations, record.fios_activations),
                ActivationSource::SalesExport,
            )
        } else {
            query
                .activation_fallback
                .map(|fb| (fb.count, fb.source))
                .unwrap_or((0.0, ActivationSource::Defaulted))
        };

        let inputs = KpiInputs {
            gross_profit: record.gross_profit,
            perks_rate: record.perks_rate,
            gp_per_unit: record.gp_per_unit,
            activations,
        };
        let evaluation = evaluate(&inputs, &self.settings.thresholds);
        let commission = derive_commission(
            &evaluation,
            record.gross_profit,
            &self.settings.tiers,
            self.settings.missing_gross_profit,
        )?;

        log::info!(
            "request_id={} {} tier at {} on {} matching row(s)",
            query.request_id,
            if evaluation.all_met { "high" } else { "low" },
            format_rate(commission.rate),
            matched_rows
        );

        Ok(EvaluationReport {
            request_id: query.request_id,
            employee_name: record.employee_name.clone(),
            record,
            activations,
            activation_source,
            evaluation,
            commission,
            matched_rows,
            warnings: query.warnings,
        })
    }
}

impl CandidatePipeline<EvaluationQuery, SalesRecord> for KpiEvaluationPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<EvaluationQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<EvaluationQuery, SalesRecord>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<EvaluationQuery, SalesRecord>>] {
        &self.filters
    }

    fn selector(&self) -> &dyn Selector<EvaluationQuery, SalesRecord> {
        &self.selector
    }

    fn side_effects(&self) -> &[Box<dyn SideEffect<EvaluationQuery, SalesRecord>>] {
        &self.side_effects
    }
}
