use crate::activation_loader::ActivationTable;
use crate::error::EvaluationResult;
use crate::query_hydrator::QueryHydrator;
use crate::types::{ActivationFallback, ActivationOverride, ActivationSource, EvaluationQuery};

/// State of the optional secondary activation workbook.
#[derive(Clone, Debug, Default)]
pub enum SecondarySource {
    #[default]
    NotProvided,
    Loaded(ActivationTable),
    /// The workbook was supplied but could not be used; holds the reason.
    Failed(String),
}

/// Resolves the activation count when the sales export has no activation
/// columns.
///
/// Precedence: secondary workbook, then manual override, then zero. A
/// workbook that failed to load or has no row for the target degrades to
/// zero with a warning instead of aborting the evaluation.
pub struct ActivationQueryHydrator {
    export_has_activations: bool,
    secondary: SecondarySource,
    threshold: f64,
}

impl ActivationQueryHydrator {
    pub fn new(export_has_activations: bool, secondary: SecondarySource, threshold: f64) -> Self {
        Self {
            export_has_activations,
            secondary,
            threshold,
        }
    }

    fn from_override(&self, activation_override: ActivationOverride) -> ActivationFallback {
        match activation_override {
            ActivationOverride::Count(count) => ActivationFallback {
                count,
                source: ActivationSource::ManualCount,
            },
            ActivationOverride::Met(met) => ActivationFallback {
                count: if met { self.threshold } else { 0.0 },
                source: ActivationSource::ManualFlag,
            },
        }
    }
}

const DEFAULTED: ActivationFallback = ActivationFallback {
    count: 0.0,
    source: ActivationSource::Defaulted,
};

impl QueryHydrator<EvaluationQuery> for ActivationQueryHydrator {
    fn enable(&self, _query: &EvaluationQuery) -> bool {
        !self.export_has_activations
    }

    fn hydrate(&self, query: &EvaluationQuery) -> EvaluationResult<EvaluationQuery> {
        let mut warnings = Vec::new();

        let fallback = match &self.secondary {
            SecondarySource::Loaded(table) => match table.combined_for(&query.target) {
                Some(count) => ActivationFallback {
                    count,
                    source: ActivationSource::SecondaryWorkbook,
                },
                None => {
                    warnings.push(format!(
                        "activation workbook has no row for '{}'; VHI/FIOS activations counted as 0",
                        query.target
                    ));
                    DEFAULTED
                }
            },
            SecondarySource::Failed(reason) => {
                warnings.push(format!(
                    "could not read activation workbook ({}); VHI/FIOS activations counted as 0",
                    reason
                ));
                DEFAULTED
            }
            SecondarySource::NotProvided => match query.activation_override {
                Some(o) => self.from_override(o),
                None => {
                    warnings.push(
                        "sales export has no activation columns and no other source was given; \
                         VHI/FIOS activations counted as 0"
                            .to_string(),
                    );
                    DEFAULTED
                }
            },
        };

        Ok(EvaluationQuery {
            activation_fallback: Some(fallback),
            warnings,
            ..query.clone()
        })
    }

    fn update(&self, query: &mut EvaluationQuery, hydrated: EvaluationQuery) {
        query.activation_fallback = hydrated.activation_fallback;
        query.warnings.extend(hydrated.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation_loader::ActivationRow;

    fn table() -> ActivationTable {
        ActivationTable {
            rows: vec![ActivationRow {
                employee_name: "Marcus Allen".into(),
                fwa_activations: Some(5.0),
                fios_activations: None,
            }],
        }
    }

    fn run(hydrator: &ActivationQueryHydrator, query: EvaluationQuery) -> EvaluationQuery {
        let mut query = query;
        let hydrated = hydrator.hydrate(&query).unwrap();
        hydrator.update(&mut query, hydrated);
        query
    }

    #[test]
    fn skipped_when_export_has_counts() {
        let h = ActivationQueryHydrator::new(true, SecondarySource::NotProvided, 8.0);
        assert!(!h.enable(&EvaluationQuery::new("t", "marcus")));
    }

    #[test]
    fn workbook_count_wins_over_override() {
        let h = ActivationQueryHydrator::new(false, SecondarySource::Loaded(table()), 8.0);
        let q = run(
            &h,
            EvaluationQuery::new("t", "marcus").with_override(ActivationOverride::Count(99.0)),
        );
        let fb = q.activation_fallback.unwrap();
        assert_eq!(fb.count, 5.0);
        assert_eq!(fb.source, ActivationSource::SecondaryWorkbook);
        assert!(q.warnings.is_empty());
    }

    #[test]
    fn failed_workbook_degrades_to_zero_with_warning() {
        let h = ActivationQueryHydrator::new(false, SecondarySource::Failed("bad header".into()), 8.0);
        let q = run(&h, EvaluationQuery::new("t", "marcus"));
        assert_eq!(q.activation_fallback, Some(DEFAULTED));
        assert_eq!(q.warnings.len(), 1);
        assert!(q.warnings[0].contains("bad header"));
    }

    #[test]
    fn workbook_without_target_degrades() {
        let h = ActivationQueryHydrator::new(false, SecondarySource::Loaded(table()), 8.0);
        let q = run(&h, EvaluationQuery::new("t", "dana"));
        assert_eq!(q.activation_fallback, Some(DEFAULTED));
        assert_eq!(q.warnings.len(), 1);
    }

    #[test]
    fn manual_flag_maps_to_threshold() {
        let h = ActivationQueryHydrator::new(false, SecondarySource::NotProvided, 8.0);
        let met = run(
            &h,
            EvaluationQuery::new("t", "marcus").with_override(ActivationOverride::Met(true)),
        );
        assert_eq!(met.activation_fallback.unwrap().count, 8.0);
        let missed = run(
            &h,
            EvaluationQuery::new("t", "marcus").with_override(ActivationOverride::Met(false)),
        );
        assert_eq!(missed.activation_fallback.unwrap().count, 0.0);
        assert_eq!(missed.activation_fallback.unwrap().source, ActivationSource::ManualFlag);
    }

    #[test]
    fn nothing_available_warns() {
        let h = ActivationQueryHydrator::new(false, SecondarySource::NotProvided, 8.0);
        let q = run(&h, EvaluationQuery::new("t", "marcus"));
        assert_eq!(q.activation_fallback, Some(DEFAULTED));
        assert_eq!(q.warnings.len(), 1);
    }
}
