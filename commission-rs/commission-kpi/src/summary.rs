//! Display rows for the performance summary table and the plain-language
//! explanation of how the pay structure works.

use serde::Serialize;

use crate::evaluation::{KpiEvaluation, KpiResult, Metric};
use crate::money::{format_currency, format_rate, format_whole_dollars};
use crate::thresholds::{CommissionTiers, KpiThresholds};

/// One `Metric | Value | Threshold | Met?` row, already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub metric: String,
    pub value: String,
    pub threshold: String,
    pub met: String,
}

impl SummaryRow {
    fn from_result(result: &KpiResult) -> Self {
        let value = match (result.metric, result.value) {
            (_, None) => "N/A".to_string(),
            (Metric::GrossProfit | Metric::GpPerUnit, Some(v)) => format_currency(v),
            (Metric::PerksRate, Some(v)) => format!("{:.2}%", v),
            (Metric::Activations, Some(v)) => format!("{}", v.trunc() as i64),
        };
        Self {
            metric: result.metric.to_string(),
            value,
            threshold: format!(">= {}", format_threshold(result.metric, result.threshold)),
            met: if result.met { "Yes" } else { "No" }.to_string(),
        }
    }
}

fn format_threshold(metric: Metric, threshold: f64) -> String {
    match metric {
        Metric::GrossProfit | Metric::GpPerUnit => format_whole_dollars(threshold),
        Metric::PerksRate => format!("{}%", threshold),
        Metric::Activations => format!("{}", threshold),
    }
}

/// Format every KPI result for display, in report order.
pub fn summary_rows(evaluation: &KpiEvaluation) -> Vec<SummaryRow> {
    evaluation.results.iter().map(SummaryRow::from_result).collect()
}

/// Explain the four cutoffs and the two tiers using the configured values.
pub fn structure_explanation(thresholds: &KpiThresholds, tiers: &CommissionTiers) -> String {
    let high = format_rate(tiers.high_rate);
    let low = format_rate(tiers.low_rate);
    format!(
        "Your commission is based on whether you meet or exceed four key performance thresholds for the month:\n\
         \n\
         1. Gross Profit (GP) must be at least {gp}\n\
         2. VZ Perks Rate (VMP) must be {perks}% or higher\n\
         3. Gross Profit Per Smartphone (GP/SMT) must be {gp_unit} or more\n\
         4. VHI/FIOS Activations (combined VZ FWA GA and VZ FIOS GA) must be {act} or more. \
         FIOS counts only successfully installed transactions; VHI counts only activations, \
         minus VHI cancelled within 30 days.\n\
         \n\
         Commission payout:\n\
         - If all 4 metrics are met, your commission rate is {high} of your total GP\n\
         - If any metric is missed, your commission rate is {low} of your total GP\n",
        gp = format_whole_dollars(thresholds.gross_profit),
        perks = thresholds.perks_rate,
        gp_unit = format_whole_dollars(thresholds.gp_per_unit),
        act = thresholds.activations,
        high = high,
        low = low,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate, KpiInputs};

    #[test]
    fn rows_match_report_format() {
        let inputs = KpiInputs {
            gross_profit: Some(30_000.0),
            perks_rate: Some(60.0),
            gp_per_unit: Some(500.0),
            activations: 9.0,
        };
        let rows = summary_rows(&evaluate(&inputs, &KpiThresholds::default()));
        assert_eq!(rows[0].metric, "Gross Profit");
        assert_eq!(rows[0].value, "$30,000.00");
        assert_eq!(rows[0].threshold, ">= $25,000");
        assert_eq!(rows[0].met, "Yes");
        assert_eq!(rows[1].value, "60.00%");
        assert_eq!(rows[1].threshold, ">= 55%");
        assert_eq!(rows[2].threshold, ">= $460");
        assert_eq!(rows[3].value, "9");
        assert_eq!(rows[3].threshold, ">= 8");
    }

    #[test]
    fn unavailable_renders_na() {
        let inputs = KpiInputs {
            gross_profit: None,
            ..KpiInputs::default()
        };
        let rows = summary_rows(&evaluate(&inputs, &KpiThresholds::default()));
        assert_eq!(rows[0].value, "N/A");
        assert_eq!(rows[0].met, "No");
        assert_eq!(rows[3].value, "0");
    }

    #[test]
    fn explanation_uses_configured_values() {
        let t = KpiThresholds {
            gross_profit: 40_000.0,
            ..KpiThresholds::default()
        };
        let text = structure_explanation(&t, &CommissionTiers::default());
        assert!(text.contains("at least $40,000"));
        assert!(text.contains("30% of your total GP"));
        assert!(text.contains("25% of your total GP"));
    }
}
