//! Payout and report period labels.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{SettlementError, SettlementResult};

/// A period label such as `October 2026`.
///
/// `YYYY-MM` input is turned into a month-name label; anything else is
/// used verbatim so pay-cycle labels like `Q3 true-up` still work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Period {
    label: String,
}

impl Period {
    pub fn parse(raw: &str) -> SettlementResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SettlementError::InvalidPeriod(raw.to_string()));
        }
        let label = match NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
            Ok(date) => date.format("%B %Y").to_string(),
            Err(_) => raw.to_string(),
        };
        Ok(Self { label })
    }

    /// Period for a calendar month.
    pub fn month(year: i32, month: u32) -> SettlementResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| Self {
                label: date.format("%B %Y").to_string(),
            })
            .ok_or_else(|| SettlementError::InvalidPeriod(format!("{:04}-{:02}", year, month)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Deterministic artifact name derived from the payout period,
/// e.g. `Commission_Settlement_October_2026.pdf`.
pub fn settlement_file_name(payout: &Period) -> String {
    let mut slug = String::with_capacity(payout.label.len());
    for c in payout.label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    format!("Commission_Settlement_{}.pdf", slug.trim_matches('_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_becomes_month_name() {
        assert_eq!(Period::parse("2026-10").unwrap().label(), "October 2026");
        assert_eq!(Period::parse(" 2025-01 ").unwrap().label(), "January 2025");
    }

    #[test]
    fn free_form_labels_pass_through() {
        assert_eq!(Period::parse("Q3 true-up").unwrap().label(), "Q3 true-up");
        assert_eq!(Period::parse("2026-13").unwrap().label(), "2026-13");
    }

    #[test]
    fn blank_period_rejected() {
        assert!(matches!(Period::parse("  "), Err(SettlementError::InvalidPeriod(_))));
    }

    #[test]
    fn month_constructor_validates() {
        assert_eq!(Period::month(2026, 9).unwrap().label(), "September 2026");
        assert!(Period::month(2026, 0).is_err());
    }

    #[test]
    fn file_name_is_stable() {
        let p = Period::parse("2026-10").unwrap();
        assert_eq!(settlement_file_name(&p), "Commission_Settlement_October_2026.pdf");
        let q = Period::parse("Q3 / true-up").unwrap();
        assert_eq!(settlement_file_name(&q), "Commission_Settlement_Q3_true_up.pdf");
    }
}
