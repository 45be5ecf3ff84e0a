//! Optional JSON configuration file.

use std::fs;

use anyhow::{Context, Result};
use commission_pipeline::EvaluationSettings;
use commission_settlement::{DrawMode, OverlayLayout};
use serde::{Deserialize, Serialize};

/// Everything tunable without recompiling. Every field has a default, so
/// a file only needs the keys it changes.
///
/// ```json
/// {
///   "thresholds": { "gross_profit": 30000 },
///   "tiers": { "high_rate": 0.32 },
///   "missing_gross_profit": "reject",
///   "draw_mode": "total"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    #[serde(flatten)]
    pub evaluation: EvaluationSettings,
    pub draw_mode: DrawMode,
    pub overlay: OverlayLayout,
}

impl CommissionConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid configuration JSON")
    }

    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path))?;
        let config =
            Self::from_json(&text).with_context(|| format!("in config file {}", path))?;
        log::debug!("loaded configuration from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_kpi::MissingGrossProfitPolicy;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(CommissionConfig::from_json("{}").unwrap(), CommissionConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = CommissionConfig::from_json(
            r#"{
                "thresholds": {"gross_profit": 30000},
                "tiers": {"high_rate": 0.32},
                "missing_gross_profit": "reject",
                "draw_mode": "total",
                "columns": {"employee": "Rep"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.evaluation.thresholds.gross_profit, 30_000.0);
        assert_eq!(config.evaluation.thresholds.perks_rate, 55.0);
        assert_eq!(config.evaluation.tiers.high_rate, 0.32);
        assert_eq!(config.evaluation.tiers.low_rate, 0.25);
        assert_eq!(config.evaluation.columns.employee, "Rep");
        assert_eq!(config.evaluation.columns.gross_profit, "GP");
        assert_eq!(config.evaluation.missing_gross_profit, MissingGrossProfitPolicy::Reject);
        assert_eq!(config.draw_mode, DrawMode::Total);
        assert_eq!(config.overlay, OverlayLayout::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CommissionConfig::from_json("{ thresholds").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = CommissionConfig::load("/nonexistent/commission.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/commission.json"));
    }
}
