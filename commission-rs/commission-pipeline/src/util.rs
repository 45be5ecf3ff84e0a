/// Extract a short type name from the full module path.
///
/// Given `"commission_pipeline::components::EmployeeNameFilter"`, returns
/// `"EmployeeNameFilter"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Case-insensitive substring match used to find the target employee.
pub fn name_matches(name: &str, target: &str) -> bool {
    name.to_lowercase().contains(&target.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_module_path() {
        assert_eq!(short_type_name("a::b::LatestRecordSelector"), "LatestRecordSelector");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn name_match_ignores_case() {
        assert!(name_matches("Marcus Allen", "marcus"));
        assert!(name_matches("MARCUS ALLEN", "Allen"));
        assert!(!name_matches("Dana Whitfield", "marcus"));
    }
}
