//! Completeness validation report.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    UncoveredComponents,
    MixedJurisdictions,
    MissingRuleClauses,
    UnresolvedAssembly,
    UnresolvedClause,
}

/// One validation finding. Warnings and errors share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    /// Rule the finding is about, for rule-scoped findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Components, clause codes or jurisdictions the finding names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
}

impl ValidationIssue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            rule: None,
            subjects: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = subjects;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMap {
    pub total_components_required: usize,
    /// Required components linked to at least one collected clause.
    pub components_with_clauses: usize,
    pub coverage_percentage: f64,
    pub total_clauses_found: usize,
    pub rules_applied: usize,
}

impl Default for CoverageMap {
    fn default() -> Self {
        Self {
            total_components_required: 0,
            components_with_clauses: 0,
            coverage_percentage: 100.0,
            total_clauses_found: 0,
            rules_applied: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_complete: bool,
    pub warnings: Vec<ValidationIssue>,
    pub errors: Vec<ValidationIssue>,
    pub coverage_map: CoverageMap,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_complete: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            coverage_map: CoverageMap::default(),
            recommendations: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Rules named by missing-clause errors.
    pub fn incomplete_rules(&self) -> Vec<String> {
        self.errors
            .iter()
            .filter(|e| e.issue_type == IssueType::MissingRuleClauses)
            .filter_map(|e| e.rule.clone())
            .collect()
    }
}
