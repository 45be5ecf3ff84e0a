//! Secondary activation workbook loader.
//!
//! Some months the KPI export ships without FWA/FIOS columns and the counts
//! live in a separate activations workbook (exported as CSV). Its headers
//! are hand-typed in Excel and often carry wrapped lines and stray non-ASCII
//! bytes, so both the file headers and the configured names are normalized
//! before matching.

use std::io::Read;

use commission_kpi::coerce::parse_count;
use commission_kpi::combine_activations;
use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, EvaluationResult};
use crate::util::name_matches;

/// Names of the secondary workbook's columns (compared after normalization).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryColumnMap {
    pub employee: String,
    pub fwa_activations: String,
    pub fios_activations: String,
}

impl Default for SecondaryColumnMap {
    fn default() -> Self {
        Self {
            employee: "Employee".into(),
            fwa_activations: "VZ FWA GA".into(),
            fios_activations: "VZ FIOS GA".into(),
        }
    }
}

/// Strip non-ASCII characters, turn embedded line breaks into spaces and
/// collapse runs of whitespace.
///
/// `"VZ FWA\r\nGA\u{a0}"` becomes `"VZ FWA GA"`.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii)
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One workbook row.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationRow {
    pub employee_name: String,
    pub fwa_activations: Option<f64>,
    pub fios_activations: Option<f64>,
}

/// All rows of the secondary workbook.
#[derive(Clone, Debug, Default)]
pub struct ActivationTable {
    pub rows: Vec<ActivationRow>,
}

impl ActivationTable {
    /// Combined activations for the last row whose employee name contains
    /// `target` (case-insensitive). `None` when nobody matches.
    pub fn combined_for(&self, target: &str) -> Option<f64> {
        self.rows
            .iter()
            .filter(|r| name_matches(&r.employee_name, target))
            .last()
            .map(|r| combine_activations(r.fwa_activations, r.fios_activations))
    }
}

/// Load the secondary workbook from a CSV reader.
pub fn load_activations<R: Read>(
    reader: R,
    columns: &SecondaryColumnMap,
) -> EvaluationResult<ActivationTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize_header).collect();
    let find = |name: &str| -> EvaluationResult<usize> {
        let wanted = normalize_header(name);
        headers
            .iter()
            .position(|h| *h == wanted)
            .ok_or_else(|| EvaluationError::MissingColumn {
                column: wanted,
                available: headers.join(", "),
            })
    };
    let employee = find(&columns.employee)?;
    let fwa = find(&columns.fwa_activations)?;
    let fios = find(&columns.fios_activations)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        rows.push(ActivationRow {
            employee_name: cell(employee).to_string(),
            fwa_activations: parse_count(cell(fwa)),
            fios_activations: parse_count(cell(fios)),
        });
    }

    log::info!("loaded {} activation workbook rows", rows.len());
    Ok(ActivationTable { rows })
}

/// Load the secondary workbook from a CSV file path.
pub fn load_activations_file(
    path: &str,
    columns: &SecondaryColumnMap,
) -> EvaluationResult<ActivationTable> {
    let file = std::fs::File::open(path).map_err(|source| EvaluationError::Io {
        path: path.to_string(),
        source,
    })?;
    load_activations(file, columns)
}
