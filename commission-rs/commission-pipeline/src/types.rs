use std::fmt;

use commission_kpi::{
    CommissionOutcome, CommissionTiers, KpiEvaluation, KpiThresholds, MissingGrossProfitPolicy,
};
use serde::{Deserialize, Serialize};

use crate::activation_loader::SecondaryColumnMap;
use crate::candidate_pipeline::HasRequestId;
use crate::sales_loader::{ColumnMap, SalesRecord};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything that shapes an evaluation besides the data itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub thresholds: KpiThresholds,
    pub tiers: CommissionTiers,
    pub columns: ColumnMap,
    pub secondary_columns: SecondaryColumnMap,
    pub missing_gross_profit: MissingGrossProfitPolicy,
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Manual activation input used when no data source has the counts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationOverride {
    /// Combined FWA + FIOS count entered by hand.
    Count(f64),
    /// Hand-entered "target met?" answer.
    Met(bool),
}

/// Where the combined activation count came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActivationSource {
    SalesExport,
    SecondaryWorkbook,
    ManualCount,
    ManualFlag,
    /// Nothing available; counted as zero.
    Defaulted,
}

impl fmt::Display for ActivationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationSource::SalesExport => write!(f, "sales export"),
            ActivationSource::SecondaryWorkbook => write!(f, "activation workbook"),
            ActivationSource::ManualCount => write!(f, "manual count"),
            ActivationSource::ManualFlag => write!(f, "manual yes/no"),
            ActivationSource::Defaulted => write!(f, "none (counted as 0)"),
        }
    }
}

/// Activation count resolved before the sales record is selected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActivationFallback {
    pub count: f64,
    pub source: ActivationSource,
}

/// One evaluation request.
#[derive(Clone, Debug)]
pub struct EvaluationQuery {
    pub request_id: String,
    /// Case-insensitive substring of the employee name.
    pub target: String,
    pub activation_override: Option<ActivationOverride>,
    /// Filled by the activation query hydrator when the export lacks counts.
    pub activation_fallback: Option<ActivationFallback>,
    /// Non-blocking problems found while hydrating.
    pub warnings: Vec<String>,
}

impl EvaluationQuery {
    pub fn new(request_id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            target: target.into(),
            activation_override: None,
            activation_fallback: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_override(mut self, activation_override: ActivationOverride) -> Self {
        self.activation_override = Some(activation_override);
        self
    }
}

impl HasRequestId for EvaluationQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything a caller needs to show the evaluation and pay the commission.
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationReport {
    pub request_id: String,
    /// Name exactly as it appears on the selected row.
    pub employee_name: String,
    pub record: SalesRecord,
    pub activations: f64,
    pub activation_source: ActivationSource,
    pub evaluation: KpiEvaluation,
    pub commission: CommissionOutcome,
    /// Rows that matched the target before selecting the latest.
    pub matched_rows: usize,
    pub warnings: Vec<String>,
}
