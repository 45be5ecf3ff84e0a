//! Centralized KPI cutoffs and commission tiers.
//!
//! These defaults match the monthly retail wireless plan (GP, VZ Perks,
//! GP per smartphone, VHI/FIOS activations). Changing a value here affects
//! BOTH KPI evaluation (in `evaluation.rs`) and the structure explanation
//! rendered by `summary.rs`.

use serde::{Deserialize, Serialize};

/// Minimum monthly gross profit, in dollars.
pub const GROSS_PROFIT_THRESHOLD: f64 = 25_000.0;

/// Minimum VZ Perks attach rate, as a whole-number percentage.
pub const PERKS_RATE_THRESHOLD: f64 = 55.0;

/// Minimum gross profit per smartphone sold, in dollars.
pub const GP_PER_UNIT_THRESHOLD: f64 = 460.0;

/// Minimum combined FWA (VHI) + FIOS activations.
pub const ACTIVATIONS_THRESHOLD: f64 = 8.0;

/// Commission rate paid when every KPI is met.
pub const HIGH_TIER_RATE: f64 = 0.30;

/// Commission rate paid when any KPI is missed.
pub const LOW_TIER_RATE: f64 = 0.25;

/// The four KPI cutoffs. All comparisons are `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiThresholds {
    pub gross_profit: f64,
    pub perks_rate: f64,
    pub gp_per_unit: f64,
    pub activations: f64,
}

impl Default for KpiThresholds {
    fn default() -> Self {
        Self {
            gross_profit: GROSS_PROFIT_THRESHOLD,
            perks_rate: PERKS_RATE_THRESHOLD,
            gp_per_unit: GP_PER_UNIT_THRESHOLD,
            activations: ACTIVATIONS_THRESHOLD,
        }
    }
}

/// The two commission rates, expressed as fractions (0.30 = 30%).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionTiers {
    pub high_rate: f64,
    pub low_rate: f64,
}

impl Default for CommissionTiers {
    fn default() -> Self {
        Self {
            high_rate: HIGH_TIER_RATE,
            low_rate: LOW_TIER_RATE,
        }
    }
}
