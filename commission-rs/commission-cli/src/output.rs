//! Terminal and JSON output.

use chrono::Utc;
use serde::Serialize;

use commission_kpi::{format_currency, format_rate, structure_explanation, summary_rows, Tier};
use commission_pipeline::{EvaluationReport, EvaluationSettings};

use crate::StatementArtifact;

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EvaluationJson {
    generated_at: String,
    request_id: String,
    employee: String,
    /// Zero-based data row the figures came from.
    row: usize,
    matched_rows: usize,
    kpis: Vec<KpiJson>,
    all_met: bool,
    tier: &'static str,
    /// Fraction, e.g. 0.30.
    rate: f64,
    rate_display: String,
    commission_earned: f64,
    commission_earned_display: String,
    activations: f64,
    activation_source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement: Option<StatementJson>,
}

#[derive(Serialize)]
struct KpiJson {
    metric: String,
    value: Option<f64>,
    threshold: f64,
    met: bool,
}

#[derive(Serialize)]
struct StatementJson {
    file: String,
    overlay: bool,
    payout_period: String,
    report_period: String,
    gross_profit: f64,
    rate: f64,
    draw_deduction: f64,
    net_commission: f64,
    paid_total: f64,
    paid_total_display: String,
}

fn tier_str(tier: Tier) -> &'static str {
    match tier {
        Tier::High => "high",
        Tier::Low => "low",
    }
}

pub fn build_json(report: &EvaluationReport, artifact: Option<&StatementArtifact>) -> EvaluationJson {
    EvaluationJson {
        generated_at: Utc::now().to_rfc3339(),
        request_id: report.request_id.clone(),
        employee: report.employee_name.clone(),
        row: report.record.row,
        matched_rows: report.matched_rows,
        kpis: report
            .evaluation
            .results
            .iter()
            .map(|r| KpiJson {
                metric: r.metric.to_string(),
                value: r.value,
                threshold: r.threshold,
                met: r.met,
            })
            .collect(),
        all_met: report.evaluation.all_met,
        tier: tier_str(report.commission.tier),
        rate: report.commission.rate,
        rate_display: format_rate(report.commission.rate),
        commission_earned: report.commission.earned,
        commission_earned_display: format_currency(report.commission.earned),
        activations: report.activations,
        activation_source: report.activation_source.to_string(),
        warnings: report.warnings.clone(),
        statement: artifact.map(|a| StatementJson {
            file: a.path.display().to_string(),
            overlay: a.overlay,
            payout_period: a.statement.payout_period.to_string(),
            report_period: a.statement.report_period.to_string(),
            gross_profit: a.statement.gross_profit,
            rate: a.statement.rate,
            draw_deduction: a.statement.draw_deduction,
            net_commission: a.statement.net_commission,
            paid_total: a.statement.paid_total,
            paid_total_display: format_currency(a.statement.paid_total),
        }),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// The performance summary table, one line per KPI.
pub fn summary_table(report: &EvaluationReport) -> String {
    let mut out = format!(
        "  {:<34} {:>14}  {:<12} {}\n",
        "Metric", "Value", "Threshold", "Met?"
    );
    out.push_str(&format!("  {:\u{2500}<68}\n", ""));
    for row in summary_rows(&report.evaluation) {
        out.push_str(&format!(
            "  {:<34} {:>14}  {:<12} {}\n",
            row.metric, row.value, row.threshold, row.met
        ));
    }
    out
}

pub fn print_human(
    report: &EvaluationReport,
    settings: &EvaluationSettings,
    artifact: Option<&StatementArtifact>,
) {
    println!();
    println!("  Commission evaluation for {}", report.employee_name);
    if report.matched_rows > 1 {
        println!(
            "  {} rows matched; using the latest (row {})",
            report.matched_rows,
            report.record.row + 1
        );
    }
    println!();
    print!("{}", summary_table(report));
    println!();
    println!("  VHI/FIOS activations from: {}", report.activation_source);
    println!(
        "  Commission rate:   {} ({})",
        format_rate(report.commission.rate),
        report.commission.tier
    );
    println!(
        "  Commission earned: {}",
        format_currency(report.commission.earned)
    );
    let missed: Vec<String> = report.evaluation.missed().map(|m| m.to_string()).collect();
    if !missed.is_empty() {
        println!("  Missed:            {}", missed.join(", "));
    }
    println!();

    for warning in &report.warnings {
        println!("  Warning: {}", warning);
    }
    if !report.warnings.is_empty() {
        println!();
    }

    for line in structure_explanation(&settings.thresholds, &settings.tiers).lines() {
        println!("  {}", line);
    }
    println!();

    if let Some(artifact) = artifact {
        print!("{}", artifact.document.render_text());
        println!("Statement written to {}", artifact.path.display());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_pipeline::{load_sales, ColumnMap, EvaluationQuery, KpiEvaluationPipeline};

    const EXPORT: &str = "\
Employee Full Name,GP,VZ Perks Rate,GP Per SMT,VZ FWA GA,VZ FIOS GA
Marcus Allen,\"$30,000.00\",60%,$500.00,5,4
";

    fn report() -> EvaluationReport {
        let table = load_sales(EXPORT.as_bytes(), &ColumnMap::default()).unwrap();
        KpiEvaluationPipeline::new(table, EvaluationSettings::default())
            .evaluate(EvaluationQuery::new("t-1", "marcus"))
            .unwrap()
    }

    #[test]
    fn json_contract_fields() {
        let json = serde_json::to_value(build_json(&report(), None)).unwrap();
        assert_eq!(json["employee"], "Marcus Allen");
        assert_eq!(json["tier"], "high");
        assert_eq!(json["rate"], 0.30);
        assert_eq!(json["rate_display"], "30%");
        assert_eq!(json["commission_earned_display"], "$9,000.00");
        assert_eq!(json["kpis"].as_array().unwrap().len(), 4);
        assert_eq!(json["kpis"][0]["metric"], "Gross Profit");
        assert!(json.get("statement").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn summary_table_has_header_and_four_rows() {
        let table = summary_table(&report());
        assert_eq!(table.lines().count(), 6);
        assert!(table.contains("$30,000.00"));
        assert!(table.contains(">= $25,000"));
        assert!(table.contains("60.00%"));
    }
}
