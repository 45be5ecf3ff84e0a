//! Settlement statement figures.
//!
//! Net commission and paid total are computed here and nowhere else, so
//! every renderer shows the same numbers.

use commission_kpi::Tier;
use serde::{Deserialize, Serialize};

use crate::error::{SettlementError, SettlementResult};
use crate::period::Period;

/// How the draw amount turns into a deduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// `draw_amount` is paid per draw: deduction = amount × count.
    #[default]
    PerDraw,
    /// `draw_amount` is already the total advanced this period.
    Total,
}

/// Figures handed to the renderer.
#[derive(Clone, Debug)]
pub struct SettlementInput {
    pub payee: String,
    pub gross_profit: f64,
    /// Fraction, e.g. 0.30. Net commission is `gross_profit * rate`,
    /// the same product the evaluator reports as earned.
    pub rate: f64,
    pub draw_amount: f64,
    pub draw_count: u32,
    pub draw_mode: DrawMode,
    pub payout_period: Period,
    pub report_period: Period,
    /// Tier the rate came from, when known.
    pub tier: Option<Tier>,
}

/// A fully computed settlement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettlementStatement {
    pub payee: String,
    pub payout_period: Period,
    pub report_period: Period,
    pub gross_profit: f64,
    pub rate: f64,
    pub tier: Option<Tier>,
    pub draw_amount: f64,
    pub draw_count: u32,
    pub draw_mode: DrawMode,
    pub draw_deduction: f64,
    pub net_commission: f64,
    /// Net commission minus draws. Negative when draws exceed commission.
    pub paid_total: f64,
}

fn require_finite(field: &str, value: f64) -> SettlementResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettlementError::InvalidParameter {
            field: field.to_string(),
            reason: format!("{} is not a finite amount", value),
        })
    }
}

impl SettlementStatement {
    pub fn compute(input: SettlementInput) -> SettlementResult<Self> {
        require_finite("gross_profit", input.gross_profit)?;
        require_finite("draw_amount", input.draw_amount)?;
        require_finite("rate", input.rate)?;
        if !(0.0..=1.0).contains(&input.rate) {
            return Err(SettlementError::InvalidParameter {
                field: "rate".into(),
                reason: format!("{} is outside 0..=1", input.rate),
            });
        }

        let net_commission = input.gross_profit * input.rate;
        let draw_deduction = match input.draw_mode {
            DrawMode::PerDraw => input.draw_amount * f64::from(input.draw_count),
            DrawMode::Total => input.draw_amount,
        };
        let paid_total = net_commission - draw_deduction;

        if paid_total < 0.0 {
            log::warn!(
                "draws exceed net commission for {}; paid total is negative",
                input.payee
            );
        }

        Ok(Self {
            payee: input.payee,
            payout_period: input.payout_period,
            report_period: input.report_period,
            gross_profit: input.gross_profit,
            rate: input.rate,
            tier: input.tier,
            draw_amount: input.draw_amount,
            draw_count: input.draw_count,
            draw_mode: input.draw_mode,
            draw_deduction,
            net_commission,
            paid_total,
        })
    }
}
