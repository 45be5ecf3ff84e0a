use crate::error::EvaluationResult;
use crate::filter::{Filter, FilterResult};
use crate::sales_loader::SalesRecord;
use crate::types::EvaluationQuery;
use crate::util::name_matches;

/// Keeps only rows whose employee name contains the query target,
/// ignoring case.
pub struct EmployeeNameFilter;

impl Filter<EvaluationQuery, SalesRecord> for EmployeeNameFilter {
    fn filter(
        &self,
        query: &EvaluationQuery,
        candidates: Vec<SalesRecord>,
    ) -> EvaluationResult<FilterResult<SalesRecord>> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|r| name_matches(&r.employee_name, &query.target));

        Ok(FilterResult { kept, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, name: &str) -> SalesRecord {
        SalesRecord {
            row,
            employee_name: name.into(),
            ..SalesRecord::default()
        }
    }

    #[test]
    fn keeps_case_insensitive_substring_matches() {
        let candidates = vec![
            record(0, "Marcus Allen"),
            record(1, "Dana Whitfield"),
            record(2, "MARCUS ALLEN"),
        ];
        let query = EvaluationQuery::new("t", "marcus");
        let FilterResult { kept, removed } = EmployeeNameFilter.filter(&query, candidates).unwrap();
        assert_eq!(kept.iter().map(|r| r.row).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].employee_name, "Dana Whitfield");
    }
}
