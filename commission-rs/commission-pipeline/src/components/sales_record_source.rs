use crate::error::EvaluationResult;
use crate::sales_loader::SalesRecord;
use crate::source::Source;
use crate::types::EvaluationQuery;

/// Serves the rows of an already-loaded sales export.
pub struct SalesRecordSource {
    records: Vec<SalesRecord>,
}

impl SalesRecordSource {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }
}

impl Source<EvaluationQuery, SalesRecord> for SalesRecordSource {
    fn enable(&self, _query: &EvaluationQuery) -> bool {
        !self.records.is_empty()
    }

    fn get_candidates(&self, _query: &EvaluationQuery) -> EvaluationResult<Vec<SalesRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_for_empty_export() {
        let source = SalesRecordSource::new(Vec::new());
        assert!(!source.enable(&EvaluationQuery::new("t", "marcus")));
    }

    #[test]
    fn serves_rows_in_input_order() {
        let records: Vec<SalesRecord> = (0..3)
            .map(|row| SalesRecord {
                row,
                ..SalesRecord::default()
            })
            .collect();
        let source = SalesRecordSource::new(records);
        let got = source
            .get_candidates(&EvaluationQuery::new("t", "marcus"))
            .unwrap();
        assert_eq!(got.iter().map(|r| r.row).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
