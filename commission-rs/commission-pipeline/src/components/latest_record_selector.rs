use crate::sales_loader::SalesRecord;
use crate::selector::Selector;
use crate::types::EvaluationQuery;

/// Picks the most recent matching row.
///
/// Recency is input order: the export is appended chronologically, so the
/// row with the highest position wins. Older rows for the same person are
/// dropped silently.
pub struct LatestRecordSelector;

impl Selector<EvaluationQuery, SalesRecord> for LatestRecordSelector {
    fn score(&self, candidate: &SalesRecord) -> f64 {
        candidate.row as f64
    }

    fn size(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_row_wins() {
        let candidates: Vec<SalesRecord> = [4usize, 9, 2]
            .into_iter()
            .map(|row| SalesRecord {
                row,
                ..SalesRecord::default()
            })
            .collect();
        let selected = LatestRecordSelector.select(&EvaluationQuery::new("t", "m"), candidates);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].row, 9);
    }

    #[test]
    fn empty_in_empty_out() {
        let selected = LatestRecordSelector.select(&EvaluationQuery::new("t", "m"), Vec::new());
        assert!(selected.is_empty());
    }
}
