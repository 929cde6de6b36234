//! Scenario Planner
//!
//! Builds the execution plan by filtering and ordering scenarios.
//!
//! Filtering options:
//! - Regex pattern matching on scenario ID
//! - Method filtering (parametric, permutation, bootstrap, ...)
//!
//! Ordering: Scenarios are sorted alphabetically by ID for deterministic execution.

use crate::scenarios::ScenarioDef;

/// Execution plan for scenarios
pub struct ExecutionPlan {
    /// Ordered list of scenarios to run
    pub scenarios: Vec<&'static ScenarioDef>,
}

/// Build execution plan from registered scenarios
pub fn build_plan(
    scenarios: impl IntoIterator<Item = &'static ScenarioDef>,
    filter: Option<&regex::Regex>,
    method: Option<&str>,
) -> ExecutionPlan {
    let mut selected: Vec<_> = scenarios
        .into_iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(s.id)))
        .filter(|s| method.is_none_or(|m| s.method == m))
        .collect();

    selected.sort_by_key(|s| s.id);

    ExecutionPlan {
        scenarios: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::registry;
    use regex::Regex;

    fn ids(plan: &ExecutionPlan) -> Vec<&'static str> {
        plan.scenarios.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_no_filter_sorts_everything() {
        let plan = build_plan(registry(), None, None);
        assert_eq!(
            ids(&plan),
            vec!["coin", "crossval", "exams", "groups", "measurements", "regression"]
        );
    }

    #[test]
    fn test_regex_filter() {
        let re = Regex::new("^(coin|groups)$").unwrap();
        let plan = build_plan(registry(), Some(&re), None);
        assert_eq!(ids(&plan), vec!["coin", "groups"]);
    }

    #[test]
    fn test_partial_match() {
        let re = Regex::new("ss").unwrap();
        let plan = build_plan(registry(), Some(&re), None);
        assert_eq!(ids(&plan), vec!["crossval", "regression"]);
    }

    #[test]
    fn test_method_filter() {
        let plan = build_plan(registry(), None, Some("parametric"));
        assert_eq!(ids(&plan), vec!["coin", "exams"]);
    }

    #[test]
    fn test_no_match() {
        let re = Regex::new("dice").unwrap();
        assert!(build_plan(registry(), Some(&re), None).scenarios.is_empty());
    }
}
