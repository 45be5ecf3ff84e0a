//! KPI evaluation against the configured thresholds.
//!
//! Every metric is tested with inclusive `>=` semantics. A metric whose
//! value could not be coerced is reported as unavailable and is never met.

use std::fmt;

use serde::Serialize;

use crate::thresholds::KpiThresholds;

// ---------------------------------------------------------------------------
// Metric definitions
// ---------------------------------------------------------------------------

/// The four monitored KPIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    GrossProfit,
    PerksRate,
    GpPerUnit,
    Activations,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Metric; 4] = [
        Metric::GrossProfit,
        Metric::PerksRate,
        Metric::GpPerUnit,
        Metric::Activations,
    ];

    /// Cutoff for this metric.
    pub fn threshold(&self, thresholds: &KpiThresholds) -> f64 {
        match self {
            Metric::GrossProfit => thresholds.gross_profit,
            Metric::PerksRate => thresholds.perks_rate,
            Metric::GpPerUnit => thresholds.gp_per_unit,
            Metric::Activations => thresholds.activations,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::GrossProfit => write!(f, "Gross Profit"),
            Metric::PerksRate => write!(f, "VMP (VZ Perks Rate)"),
            Metric::GpPerUnit => write!(f, "Gross Profit Per Smartphone"),
            Metric::Activations => write!(f, "VHI/FIOS Activations"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and results
// ---------------------------------------------------------------------------

/// Normalized monitored fields of the selected sales record.
///
/// `activations` is already combined and therefore never missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct KpiInputs {
    pub gross_profit: Option<f64>,
    pub perks_rate: Option<f64>,
    pub gp_per_unit: Option<f64>,
    pub activations: f64,
}

impl KpiInputs {
    fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::GrossProfit => self.gross_profit,
            Metric::PerksRate => self.perks_rate,
            Metric::GpPerUnit => self.gp_per_unit,
            Metric::Activations => Some(self.activations),
        }
    }
}

/// Sum the two activation sources, treating a missing count as zero.
pub fn combine_activations(fwa: Option<f64>, fios: Option<f64>) -> f64 {
    fwa.unwrap_or(0.0) + fios.unwrap_or(0.0)
}

/// Outcome of testing one metric against its cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KpiResult {
    pub metric: Metric,
    /// Observed value, `None` when the cell was not numeric.
    pub value: Option<f64>,
    pub threshold: f64,
    pub met: bool,
}

impl KpiResult {
    pub fn evaluate(metric: Metric, value: Option<f64>, threshold: f64) -> Self {
        Self {
            metric,
            value,
            threshold,
            met: value.is_some_and(|v| v >= threshold),
        }
    }
}

/// All four KPI results plus the aggregate decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiEvaluation {
    pub results: Vec<KpiResult>,
    pub all_met: bool,
}

impl KpiEvaluation {
    /// Look up the result for a single metric.
    pub fn result(&self, metric: Metric) -> Option<&KpiResult> {
        self.results.iter().find(|r| r.metric == metric)
    }

    /// Metrics that failed, in report order.
    pub fn missed(&self) -> impl Iterator<Item = Metric> + '_ {
        self.results.iter().filter(|r| !r.met).map(|r| r.metric)
    }
}

/// Evaluate every KPI. `all_met` is true only if each of the four is met.
pub fn evaluate(inputs: &KpiInputs, thresholds: &KpiThresholds) -> KpiEvaluation {
    let results: Vec<KpiResult> = Metric::ALL
        .iter()
        .map(|&metric| KpiResult::evaluate(metric, inputs.value(metric), metric.threshold(thresholds)))
        .collect();
    let all_met = results.iter().all(|r| r.met);

    log::debug!(
        "kpi evaluation: {}",
        results
            .iter()
            .map(|r| format!("{:?}={}", r.metric, if r.met { "met" } else { "missed" }))
            .collect::<Vec<_>>()
            .join(" ")
    );

    KpiEvaluation { results, all_met }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_inputs() -> KpiInputs {
        KpiInputs {
            gross_profit: Some(30_000.0),
            perks_rate: Some(60.0),
            gp_per_unit: Some(500.0),
            activations: 9.0,
        }
    }

    #[test]
    fn all_metrics_met() {
        let eval = evaluate(&passing_inputs(), &KpiThresholds::default());
        assert!(eval.all_met);
        assert_eq!(eval.results.len(), 4);
        assert_eq!(eval.missed().count(), 0);
    }

    #[test]
    fn boundary_values_are_met() {
        let t = KpiThresholds::default();
        let inputs = KpiInputs {
            gross_profit: Some(t.gross_profit),
            perks_rate: Some(t.perks_rate),
            gp_per_unit: Some(t.gp_per_unit),
            activations: t.activations,
        };
        let eval = evaluate(&inputs, &t);
        assert!(eval.results.iter().all(|r| r.met));
        assert!(eval.all_met);
    }

    #[test]
    fn missing_value_is_unmet_even_with_zero_threshold() {
        let t = KpiThresholds {
            perks_rate: 0.0,
            ..KpiThresholds::default()
        };
        let inputs = KpiInputs {
            perks_rate: None,
            ..passing_inputs()
        };
        let eval = evaluate(&inputs, &t);
        let perks = eval.result(Metric::PerksRate).unwrap();
        assert_eq!(perks.value, None);
        assert!(!perks.met);
        assert!(!eval.all_met);
    }

    #[test]
    fn single_miss_breaks_all_met() {
        let inputs = KpiInputs {
            gp_per_unit: Some(459.99),
            ..passing_inputs()
        };
        let eval = evaluate(&inputs, &KpiThresholds::default());
        assert!(!eval.all_met);
        assert_eq!(eval.missed().collect::<Vec<_>>(), vec![Metric::GpPerUnit]);
    }

    #[test]
    fn activations_combine_missing_as_zero() {
        assert_eq!(combine_activations(Some(5.0), Some(4.0)), 9.0);
        assert_eq!(combine_activations(None, Some(4.0)), 4.0);
        assert_eq!(combine_activations(None, None), 0.0);
    }

    #[test]
    fn activations_never_unavailable() {
        let inputs = KpiInputs {
            activations: combine_activations(None, None),
            ..passing_inputs()
        };
        let eval = evaluate(&inputs, &KpiThresholds::default());
        let act = eval.result(Metric::Activations).unwrap();
        assert_eq!(act.value, Some(0.0));
        assert!(!act.met);
    }
}
