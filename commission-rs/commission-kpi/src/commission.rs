//! Commission tier selection and earned amount.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation::KpiEvaluation;
use crate::thresholds::CommissionTiers;

/// Which bracket the salesperson landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Every KPI met.
    High,
    /// At least one KPI missed or unavailable.
    Low,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::High => write!(f, "high tier (all targets met)"),
            Tier::Low => write!(f, "standard tier"),
        }
    }
}

/// What to do when the gross profit cell is not numeric.
///
/// Historical versions of the calculator disagreed; the default pays
/// nothing rather than failing the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingGrossProfitPolicy {
    #[default]
    ZeroCommission,
    Reject,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommissionError {
    #[error("gross profit is missing or not numeric; cannot compute commission")]
    MissingGrossProfit,
}

/// Selected rate and the amount it earns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CommissionOutcome {
    pub tier: Tier,
    /// Fraction, e.g. 0.30.
    pub rate: f64,
    pub earned: f64,
}

/// Pick the tier from the KPI evaluation and apply it to gross profit.
pub fn derive_commission(
    evaluation: &KpiEvaluation,
    gross_profit: Option<f64>,
    tiers: &CommissionTiers,
    policy: MissingGrossProfitPolicy,
) -> Result<CommissionOutcome, CommissionError> {
    let (tier, rate) = if evaluation.all_met {
        (Tier::High, tiers.high_rate)
    } else {
        (Tier::Low, tiers.low_rate)
    };

    let earned = match (gross_profit, policy) {
        (Some(gp), _) => gp * rate,
        (None, MissingGrossProfitPolicy::ZeroCommission) => {
            log::warn!("gross profit unavailable, commission earned set to $0.00");
            0.0
        }
        (None, MissingGrossProfitPolicy::Reject) => return Err(CommissionError::MissingGrossProfit),
    };

    Ok(CommissionOutcome { tier, rate, earned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate, KpiInputs};
    use crate::thresholds::KpiThresholds;

    fn eval_with_gp(gp: Option<f64>) -> KpiEvaluation {
        let inputs = KpiInputs {
            gross_profit: gp,
            perks_rate: Some(60.0),
            gp_per_unit: Some(500.0),
            activations: 9.0,
        };
        evaluate(&inputs, &KpiThresholds::default())
    }

    #[test]
    fn all_met_pays_high_tier() {
        let eval = eval_with_gp(Some(30_000.0));
        let out = derive_commission(
            &eval,
            Some(30_000.0),
            &CommissionTiers::default(),
            MissingGrossProfitPolicy::default(),
        )
        .unwrap();
        assert_eq!(out.tier, Tier::High);
        assert_eq!(out.rate, 0.30);
        assert!((out.earned - 9_000.0).abs() < 1e-9);
    }

    #[test]
    fn miss_pays_low_tier() {
        let eval = eval_with_gp(Some(20_000.0));
        let out = derive_commission(
            &eval,
            Some(20_000.0),
            &CommissionTiers::default(),
            MissingGrossProfitPolicy::default(),
        )
        .unwrap();
        assert_eq!(out.tier, Tier::Low);
        assert_eq!(out.rate, 0.25);
        assert!((out.earned - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn missing_gp_zero_policy() {
        let eval = eval_with_gp(None);
        let out = derive_commission(
            &eval,
            None,
            &CommissionTiers::default(),
            MissingGrossProfitPolicy::ZeroCommission,
        )
        .unwrap();
        assert_eq!(out.tier, Tier::Low);
        assert_eq!(out.earned, 0.0);
    }

    #[test]
    fn missing_gp_reject_policy() {
        let eval = eval_with_gp(None);
        let err = derive_commission(
            &eval,
            None,
            &CommissionTiers::default(),
            MissingGrossProfitPolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(err, CommissionError::MissingGrossProfit);
    }

    #[test]
    fn policy_parses_snake_case() {
        let p: MissingGrossProfitPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(p, MissingGrossProfitPolicy::Reject);
    }
}
