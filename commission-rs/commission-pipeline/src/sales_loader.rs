//! CSV sales export loader.
//!
//! Parses a Power BI "KPI Details" export into `SalesRecord` structs.
//! Column names are trimmed and then matched literally (case-sensitive).
//! Required columns: employee name, GP, perks rate, GP per unit. The two
//! activation columns are optional. A lone activation column is still
//! read, with the absent one counted as missing; only when both are absent
//! is the table flagged so the pipeline can fall back to another
//! activation source.

use std::io::Read;

use commission_kpi::coerce::{parse_count, parse_currency, parse_percent};
use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, EvaluationResult};

/// Names of the primary export's columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub employee: String,
    pub gross_profit: String,
    pub perks_rate: String,
    pub gp_per_unit: String,
    pub fwa_activations: String,
    pub fios_activations: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            employee: "Employee Full Name".into(),
            gross_profit: "GP".into(),
            perks_rate: "VZ Perks Rate".into(),
            gp_per_unit: "GP Per SMT".into(),
            fwa_activations: "VZ FWA GA".into(),
            fios_activations: "VZ FIOS GA".into(),
        }
    }
}

/// One employee row with its monitored fields already coerced.
///
/// `row` is the zero-based data row position and doubles as recency:
/// later rows are assumed to be more recent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesRecord {
    pub row: usize,
    pub employee_name: String,
    pub gross_profit: Option<f64>,
    pub perks_rate: Option<f64>,
    pub gp_per_unit: Option<f64>,
    pub fwa_activations: Option<f64>,
    pub fios_activations: Option<f64>,
}

/// Every row of the export plus what the header told us.
#[derive(Clone, Debug, Default)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
    /// At least one activation column was present in the header.
    pub has_activation_columns: bool,
}

struct ColumnIndex {
    employee: usize,
    gross_profit: usize,
    perks_rate: usize,
    gp_per_unit: usize,
    fwa_activations: Option<usize>,
    fios_activations: Option<usize>,
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &[String], name: &str) -> EvaluationResult<usize> {
    find_column(headers, name).ok_or_else(|| EvaluationError::MissingColumn {
        column: name.to_string(),
        available: headers.join(", "),
    })
}

impl ColumnIndex {
    fn resolve(headers: &[String], columns: &ColumnMap) -> EvaluationResult<Self> {
        Ok(Self {
            employee: require_column(headers, &columns.employee)?,
            gross_profit: require_column(headers, &columns.gross_profit)?,
            perks_rate: require_column(headers, &columns.perks_rate)?,
            gp_per_unit: require_column(headers, &columns.gp_per_unit)?,
            fwa_activations: find_column(headers, &columns.fwa_activations),
            fios_activations: find_column(headers, &columns.fios_activations),
        })
    }

    fn has_activations(&self) -> bool {
        self.fwa_activations.is_some() || self.fios_activations.is_some()
    }
}

/// Load a sales export from a CSV reader.
pub fn load_sales<R: Read>(reader: R, columns: &ColumnMap) -> EvaluationResult<SalesTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let index = ColumnIndex::resolve(&headers, columns)?;

    match (index.fwa_activations, index.fios_activations) {
        (None, None) => log::warn!(
            "sales export lacks '{}' / '{}'; activations must come from another source",
            columns.fwa_activations,
            columns.fios_activations
        ),
        (Some(_), None) => log::warn!(
            "sales export lacks '{}'; counted as 0",
            columns.fios_activations
        ),
        (None, Some(_)) => log::warn!(
            "sales export lacks '{}'; counted as 0",
            columns.fwa_activations
        ),
        (Some(_), Some(_)) => {}
    }

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        records.push(SalesRecord {
            row,
            employee_name: cell(index.employee).to_string(),
            gross_profit: parse_currency(cell(index.gross_profit)),
            perks_rate: parse_percent(cell(index.perks_rate)),
            gp_per_unit: parse_currency(cell(index.gp_per_unit)),
            fwa_activations: index.fwa_activations.and_then(|idx| parse_count(cell(idx))),
            fios_activations: index.fios_activations.and_then(|idx| parse_count(cell(idx))),
        });
    }

    log::info!("loaded {} sales rows", records.len());

    Ok(SalesTable {
        records,
        has_activation_columns: index.has_activations(),
    })
}

/// Load a sales export from a CSV file path.
pub fn load_sales_file(path: &str, columns: &ColumnMap) -> EvaluationResult<SalesTable> {
    let file = std::fs::File::open(path).map_err(|source| EvaluationError::Io {
        path: path.to_string(),
        source,
    })?;
    load_sales(file, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Employee Full Name , GP,VZ Perks Rate,GP Per SMT,VZ FWA GA,VZ FIOS GA
Dana Whitfield,\"$18,250.00\",48%,$410.00,2,1
Marcus Allen,\"$30,000.00\",60%,$500.00,5,4
";

    #[test]
    fn load_sample_csv() {
        let table = load_sales(SAMPLE_CSV.as_bytes(), &ColumnMap::default()).unwrap();
        assert!(table.has_activation_columns);
        assert_eq!(table.records.len(), 2);
        let marcus = &table.records[1];
        assert_eq!(marcus.row, 1);
        assert_eq!(marcus.employee_name, "Marcus Allen");
        assert_eq!(marcus.gross_profit, Some(30_000.0));
        assert_eq!(marcus.perks_rate, Some(60.0));
        assert_eq!(marcus.gp_per_unit, Some(500.0));
        assert_eq!(marcus.fwa_activations, Some(5.0));
        assert_eq!(marcus.fios_activations, Some(4.0));
    }

    #[test]
    fn missing_required_column_is_blocking() {
        let csv_data = "Employee Full Name,GP,GP Per SMT\nMarcus,1,2\n";
        let err = load_sales(csv_data.as_bytes(), &ColumnMap::default()).unwrap_err();
        match err {
            EvaluationError::MissingColumn { column, available } => {
                assert_eq!(column, "VZ Perks Rate");
                assert!(available.contains("GP Per SMT"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let csv_data = "employee full name,GP,VZ Perks Rate,GP Per SMT\nMarcus,1,2,3\n";
        assert!(matches!(
            load_sales(csv_data.as_bytes(), &ColumnMap::default()),
            Err(EvaluationError::MissingColumn { .. })
        ));
    }

    #[test]
    fn activation_columns_are_optional() {
        let csv_data = "Employee Full Name,GP,VZ Perks Rate,GP Per SMT\nMarcus,1,2,3\n";
        let table = load_sales(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        assert!(!table.has_activation_columns);
        assert_eq!(table.records[0].fwa_activations, None);
        assert_eq!(table.records[0].fios_activations, None);
    }

    #[test]
    fn lone_activation_column_is_kept() {
        let csv_data = "Employee Full Name,GP,VZ Perks Rate,GP Per SMT,VZ FWA GA\nMarcus,1,2,3,4\n";
        let table = load_sales(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        assert!(table.has_activation_columns);
        assert_eq!(table.records[0].fwa_activations, Some(4.0));
        assert_eq!(table.records[0].fios_activations, None);
    }

    #[test]
    fn bad_cells_and_short_rows_become_missing() {
        let csv_data = "\
Employee Full Name,GP,VZ Perks Rate,GP Per SMT,VZ FWA GA,VZ FIOS GA
Marcus,N/A,--,$500
";
        let table = load_sales(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        let r = &table.records[0];
        assert_eq!(r.gross_profit, None);
        assert_eq!(r.perks_rate, None);
        assert_eq!(r.gp_per_unit, Some(500.0));
        assert_eq!(r.fwa_activations, None);
        assert_eq!(r.fios_activations, None);
    }

    #[test]
    fn custom_column_names() {
        let columns = ColumnMap {
            gross_profit: "Gross Profit".into(),
            ..ColumnMap::default()
        };
        let csv_data = "Employee Full Name,Gross Profit,VZ Perks Rate,GP Per SMT\nMarcus,\"$40,000\",55%,$470\n";
        let table = load_sales(csv_data.as_bytes(), &columns).unwrap();
        assert_eq!(table.records[0].gross_profit, Some(40_000.0));
    }
}
