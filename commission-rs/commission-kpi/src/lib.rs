//! KPI evaluation and commission tiers.
//!
//! Four monthly metrics are compared against inclusive cutoffs. Meeting all
//! four pays the high rate on gross profit; missing any one pays the low
//! rate. Unparseable or absent values never count as met.

pub mod coerce;
pub mod commission;
pub mod evaluation;
pub mod money;
pub mod summary;
pub mod thresholds;

pub use commission::{derive_commission, CommissionError, CommissionOutcome, MissingGrossProfitPolicy, Tier};
pub use evaluation::{combine_activations, evaluate, KpiEvaluation, KpiInputs, KpiResult, Metric};
pub use money::{format_currency, format_rate};
pub use summary::{structure_explanation, summary_rows, SummaryRow};
pub use thresholds::{CommissionTiers, KpiThresholds};
