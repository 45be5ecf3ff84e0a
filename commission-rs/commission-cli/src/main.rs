mod config;
mod output;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, Months, NaiveDate};

use commission_kpi::coerce::{parse_count, parse_currency};
use commission_pipeline::{
    load_activations_file, load_sales_file, ActivationOverride, EvaluationQuery, EvaluationReport,
    KpiEvaluationPipeline, SecondarySource,
};
use commission_settlement::{
    render_overlay, render_pdf, settlement_file_name, Period, SettlementDocument, SettlementInput,
    SettlementStatement,
};

use config::CommissionConfig;

const DEFAULT_EMPLOYEE: &str = "marcus";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Args {
    sales_path: String,
    employee: String,
    activations_path: Option<String>,
    activation_override: Option<ActivationOverride>,
    config_path: Option<String>,
    json: bool,
    statement: bool,
    draw_amount: f64,
    draw_count: u32,
    payout: Option<String>,
    report: Option<String>,
    out_dir: PathBuf,
    template_path: Option<String>,
}

fn print_usage() {
    eprintln!("Usage: commission-cli <sales.csv> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --employee NAME          Case-insensitive name filter (default: marcus)");
    eprintln!("  --activations FILE.csv   Workbook with VZ FWA GA / VZ FIOS GA per employee");
    eprintln!("  --activation-count N     Combined activation count, when no file has it");
    eprintln!("  --activation-met yes|no  Whether the activation target was met");
    eprintln!("  --config FILE.json       Thresholds, rates, column names, draw mode, overlay layout");
    eprintln!("  --json                   Output as JSON instead of formatted text");
    eprintln!("  --statement              Write the settlement PDF and print it as text");
    eprintln!("  --draw AMOUNT            Draw amount (default: 0)");
    eprintln!("  --draws N                Number of draws taken (default: 0)");
    eprintln!("  --payout YYYY-MM         Payout period (default: current month)");
    eprintln!("  --report YYYY-MM         Reporting period (default: month before payout)");
    eprintln!("  --out DIR                Where to write the PDF (default: .)");
    eprintln!("  --template FILE.pdf      Stamp figures onto a template instead (implies --statement)");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  commission-cli kpi_details.csv");
    eprintln!("  commission-cli kpi_details.csv --employee dana --json");
    eprintln!("  commission-cli kpi_details.csv --statement --draw 1800 --draws 3 --payout 2026-10");
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}

fn parse_yes_no(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => bail!("--activation-met expects yes or no, got '{}'", other),
    }
}

/// Parse everything after the program name.
fn parse_args(args: &[String]) -> Result<Args> {
    let sales_path = match args.first() {
        Some(path) if !path.starts_with("--") => path.clone(),
        _ => bail!("missing sales CSV path"),
    };

    let mut parsed = Args {
        sales_path,
        employee: DEFAULT_EMPLOYEE.to_string(),
        activations_path: None,
        activation_override: None,
        config_path: None,
        json: false,
        statement: false,
        draw_amount: 0.0,
        draw_count: 0,
        payout: None,
        report: None,
        out_dir: PathBuf::from("."),
        template_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--json" => {
                parsed.json = true;
                i += 1;
                continue;
            }
            "--statement" => {
                parsed.statement = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let value = flag_value(args, i, flag)?;
        match flag {
            "--employee" => {
                if value.trim().is_empty() {
                    bail!("--employee must not be empty");
                }
                parsed.employee = value.trim().to_string();
            }
            "--activations" => parsed.activations_path = Some(value.to_string()),
            "--activation-count" | "--activation-met" => {
                if parsed.activation_override.is_some() {
                    bail!("use only one of --activation-count and --activation-met");
                }
                parsed.activation_override = Some(if flag == "--activation-count" {
                    let count = parse_count(value)
                        .filter(|n| *n >= 0.0)
                        .with_context(|| format!("--activation-count expects a number, got '{}'", value))?;
                    ActivationOverride::Count(count)
                } else {
                    ActivationOverride::Met(parse_yes_no(value)?)
                });
            }
            "--config" => parsed.config_path = Some(value.to_string()),
            "--draw" => {
                parsed.draw_amount = parse_currency(value)
                    .filter(|n| *n >= 0.0)
                    .with_context(|| format!("--draw expects a non-negative amount, got '{}'", value))?;
            }
            "--draws" => {
                parsed.draw_count = value
                    .trim()
                    .parse()
                    .with_context(|| format!("--draws expects a whole number, got '{}'", value))?;
            }
            "--payout" => parsed.payout = Some(value.to_string()),
            "--report" => parsed.report = Some(value.to_string()),
            "--out" => parsed.out_dir = PathBuf::from(value),
            "--template" => {
                parsed.template_path = Some(value.to_string());
                parsed.statement = true;
            }
            other => bail!("unknown argument: {}", other),
        }
        i += 2;
    }

    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

fn month_start(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").ok()
}

/// Payout defaults to the current month; report defaults to the month
/// before payout.
fn resolve_periods(
    payout: Option<&str>,
    report: Option<&str>,
    today: NaiveDate,
) -> Result<(Period, Period)> {
    let payout_start = match payout {
        Some(raw) => month_start(raw),
        None => today.with_day(1),
    };
    let payout_period = match payout {
        Some(raw) => Period::parse(raw)?,
        None => Period::month(today.year(), today.month())?,
    };
    let report_period = match report {
        Some(raw) => Period::parse(raw)?,
        None => {
            let previous = payout_start
                .and_then(|start| start.checked_sub_months(Months::new(1)))
                .context("--report is required when --payout is not in YYYY-MM form")?;
            Period::month(previous.year(), previous.month())?
        }
    };
    Ok((payout_period, report_period))
}

/// The written PDF plus what went into it.
pub struct StatementArtifact {
    pub statement: SettlementStatement,
    pub document: SettlementDocument,
    pub path: PathBuf,
    pub overlay: bool,
}

fn write_statement(
    args: &Args,
    config: &CommissionConfig,
    report: &EvaluationReport,
) -> Result<StatementArtifact> {
    let (payout_period, report_period) = resolve_periods(
        args.payout.as_deref(),
        args.report.as_deref(),
        Local::now().date_naive(),
    )?;

    let statement = SettlementStatement::compute(SettlementInput {
        payee: report.employee_name.clone(),
        gross_profit: report.record.gross_profit.unwrap_or(0.0),
        rate: report.commission.rate,
        draw_amount: args.draw_amount,
        draw_count: args.draw_count,
        draw_mode: config.draw_mode,
        payout_period,
        report_period,
        tier: Some(report.commission.tier),
    })?;
    let document = SettlementDocument::from_statement(&statement);

    let bytes = match &args.template_path {
        Some(template_path) => {
            let template = fs::read(template_path)
                .with_context(|| format!("cannot read template {}", template_path))?;
            render_overlay(&template, &statement, &config.overlay)
                .with_context(|| format!("cannot fill template {}", template_path))?
        }
        None => render_pdf(&document)?,
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create output directory {}", args.out_dir.display()))?;
    let path = args.out_dir.join(settlement_file_name(&statement.payout_period));
    fs::write(&path, &bytes).with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("wrote settlement statement to {}", path.display());

    Ok(StatementArtifact {
        statement,
        document,
        path,
        overlay: args.template_path.is_some(),
    })
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn run(args: &Args) -> Result<()> {
    let config = match &args.config_path {
        Some(path) => CommissionConfig::load(path)?,
        None => CommissionConfig::default(),
    };
    let settings = config.evaluation.clone();

    let table = load_sales_file(&args.sales_path, &settings.columns)
        .with_context(|| format!("cannot load sales export {}", args.sales_path))?;

    let secondary = match &args.activations_path {
        Some(path) if !table.has_activation_columns => {
            match load_activations_file(path, &settings.secondary_columns) {
                Ok(workbook) => SecondarySource::Loaded(workbook),
                Err(e) => SecondarySource::Failed(e.to_string()),
            }
        }
        Some(path) => {
            log::info!("sales export has activation columns; ignoring {}", path);
            SecondarySource::NotProvided
        }
        None => SecondarySource::NotProvided,
    };

    let mut query = EvaluationQuery::new("cli-001", args.employee.as_str());
    if let Some(activation_override) = args.activation_override {
        query = query.with_override(activation_override);
    }

    let pipeline = KpiEvaluationPipeline::with_secondary(table, secondary, settings);
    let report = pipeline.evaluate(query)?;

    let artifact = if args.statement {
        Some(write_statement(args, &config, &report)?)
    } else {
        None
    };

    if args.json {
        let json = output::build_json(&report, artifact.as_ref());
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        output::print_human(&report, pipeline.settings(), artifact.as_ref());
    }
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // Ignore a second init; the global subscriber is already in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        process::exit(if args.is_empty() { 1 } else { 0 });
    }

    init_logging();

    let result = parse_args(&args).and_then(|parsed| run(&parsed));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
