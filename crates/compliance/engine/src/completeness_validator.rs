//! Completeness validator: checks that the expansion is fully traceable.
//!
//! Findings are data, never errors. Only a matched rule whose required
//! clauses are missing from the collection makes the report incomplete;
//! everything else is a warning.

use compliance_types::{
    ClauseCollection, ComponentExpansion, CoverageMap, IssueType, MatchedRule, Severity,
    UnresolvedReference, ValidationIssue, ValidationReport,
};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct CompletenessValidator;

impl CompletenessValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        expansion: &ComponentExpansion,
        collection: &ClauseCollection,
        rules: &[MatchedRule],
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        let uncovered = self.check_component_coverage(expansion, collection, &mut report);
        self.check_jurisdictions(collection, &mut report);
        self.check_rule_clauses(collection, rules, &mut report);
        self.check_unresolved(
            IssueType::UnresolvedAssembly,
            &expansion.unresolved_assemblies,
            &mut report,
        );
        self.check_unresolved(
            IssueType::UnresolvedClause,
            &collection.unresolved_clauses,
            &mut report,
        );

        let required = expansion.required_components.len();
        let covered = required - uncovered;
        report.coverage_map = CoverageMap {
            total_components_required: required,
            components_with_clauses: covered,
            coverage_percentage: if required == 0 {
                100.0
            } else {
                covered as f64 / required as f64 * 100.0
            },
            total_clauses_found: collection.total_clauses,
            rules_applied: rules.len(),
        };

        tracing::debug!(
            complete = report.is_complete,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            coverage = report.coverage_map.coverage_percentage,
            "Validation finished"
        );
        report
    }

    // Returns the number of uncovered components.
    fn check_component_coverage(
        &self,
        expansion: &ComponentExpansion,
        collection: &ClauseCollection,
        report: &mut ValidationReport,
    ) -> usize {
        let linked: BTreeSet<&str> = collection
            .clauses
            .iter()
            .flat_map(|c| c.applies_to_components.iter().map(String::as_str))
            .collect();
        let uncovered: Vec<String> = expansion
            .required_components
            .iter()
            .filter(|c| !linked.contains(c.as_str()))
            .cloned()
            .collect();

        if !uncovered.is_empty() {
            report.warnings.push(
                ValidationIssue::new(
                    IssueType::UncoveredComponents,
                    Severity::Medium,
                    format!(
                        "Components without linked code clauses: {}",
                        uncovered.join(", ")
                    ),
                )
                .with_subjects(uncovered.clone()),
            );
            report.recommendations.push(format!(
                "Link applicable code clauses to components: {}",
                uncovered.join(", ")
            ));
        }
        uncovered.len()
    }

    fn check_jurisdictions(&self, collection: &ClauseCollection, report: &mut ValidationReport) {
        let jurisdictions: BTreeSet<&str> = collection
            .clauses
            .iter()
            .map(|c| c.jurisdiction.as_str())
            .collect();
        if jurisdictions.len() > 1 {
            let names: Vec<String> = jurisdictions.iter().map(|j| j.to_string()).collect();
            report.warnings.push(
                ValidationIssue::new(
                    IssueType::MixedJurisdictions,
                    Severity::High,
                    format!("Clauses from multiple jurisdictions: {}", names.join(", ")),
                )
                .with_subjects(names.clone()),
            );
            report.recommendations.push(format!(
                "Confirm the governing jurisdiction; clauses were collected from {}",
                names.join(", ")
            ));
        }
    }

    fn check_rule_clauses(
        &self,
        collection: &ClauseCollection,
        rules: &[MatchedRule],
        report: &mut ValidationReport,
    ) {
        let found = collection.clause_codes();
        for matched in rules {
            let missing: BTreeSet<&str> = matched
                .required_clauses()
                .iter()
                .map(String::as_str)
                .filter(|code| !found.contains(code))
                .collect();
            if missing.is_empty() {
                continue;
            }

            let missing: Vec<String> = missing.into_iter().map(str::to_string).collect();
            report.errors.push(
                ValidationIssue::new(
                    IssueType::MissingRuleClauses,
                    Severity::Critical,
                    format!(
                        "Rule '{}' requires clauses missing from the collection: {}",
                        matched.rule.name,
                        missing.join(", ")
                    ),
                )
                .with_rule(matched.rule.name.clone())
                .with_subjects(missing.clone()),
            );
            report.recommendations.push(format!(
                "Add clauses {} to the clause store or correct rule {}",
                missing.join(", "),
                matched.rule.code
            ));
            report.is_complete = false;
        }
    }

    fn check_unresolved(
        &self,
        issue_type: IssueType,
        references: &[UnresolvedReference],
        report: &mut ValidationReport,
    ) {
        for reference in references {
            report.warnings.push(
                ValidationIssue::new(
                    issue_type,
                    Severity::Low,
                    format!(
                        "{} {} referenced by {} was not found",
                        reference.kind, reference.code, reference.referenced_by
                    ),
                )
                .with_subjects(vec![reference.code.clone()]),
            );
        }
    }
}
