//! Lint rule implementations.
//!
//! Each rule lives in its own file named after its code suffix and is
//! registered in [`all_rules`].

pub mod ag_001;
pub mod cl_001;
pub mod cl_002;
pub mod fn_001;
pub mod pq_001;
pub mod pq_002;
pub mod rf_001;
pub mod rf_002;
pub mod st_001;
pub mod st_002;
pub mod st_003;
pub mod st_004;

use super::rule::LintRule;

/// Every rule, in catalog order.
pub fn all_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(st_001::ProhibitedStatement),
        Box::new(st_002::CommonTableExpression),
        Box::new(st_003::TempTable),
        Box::new(st_004::SelectInto),
        Box::new(cl_001::LimitClause),
        Box::new(cl_002::OffsetWithoutOrderBy),
        Box::new(fn_001::UnsupportedFunction),
        Box::new(ag_001::AggregateGrouping),
        Box::new(rf_001::UnbracketedMultiWordName),
        Box::new(rf_002::AmbiguousColumn),
        Box::new(pq_001::MissingSelect),
        Box::new(pq_002::MissingFrom),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_codes_are_unique() {
        let rules = all_rules();
        let codes: HashSet<_> = rules.iter().map(|rule| rule.code()).collect();
        assert_eq!(codes.len(), rules.len());
        assert!(codes.iter().all(|code| code.starts_with("LINT_")));
    }
}
