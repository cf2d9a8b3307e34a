//! Rule matcher: evaluates jurisdiction-scoped rules against normalized input.
//!
//! Evaluation is a pure function of the decoded [`Condition`] tree and the
//! [`NormalizedInput`]. A rule that cannot be decoded is logged and skipped;
//! it never stops the remaining rules from being evaluated.

use compliance_store::RuleStore;
use compliance_types::{
    ComplianceError, ComplianceResult, Condition, Leaf, MatchedRule, NormalizedInput, Predicate,
    Rule,
};
use serde_json::Value;

/// Matches stored rules against one normalized input.
#[derive(Clone, Debug, Default)]
pub struct RuleMatcher;

impl RuleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the rules visible to the input's jurisdiction and keep those
    /// whose trigger condition holds, in store order (priority descending).
    pub fn match_rules<S>(
        &self,
        store: &S,
        input: &NormalizedInput,
    ) -> ComplianceResult<Vec<MatchedRule>>
    where
        S: RuleStore + ?Sized,
    {
        let records = store.query_rules_by_jurisdiction(&input.jurisdiction)?;
        tracing::debug!(
            jurisdiction = %input.jurisdiction,
            candidates = records.len(),
            "Evaluating rules"
        );

        let mut matched = Vec::new();
        for record in &records {
            let decoded = match Rule::decode(record) {
                Ok(decoded) => decoded,
                Err(err) => {
                    let err = ComplianceError::MalformedRuleDefinition {
                        rule: record.rule_code.clone(),
                        reason: err.to_string(),
                    };
                    tracing::warn!(rule = %record.rule_code, error = %err, "Skipping rule");
                    continue;
                }
            };
            for skipped in &decoded.skipped {
                tracing::warn!(
                    rule = %record.rule_code,
                    field = skipped.field,
                    entry = %skipped.entry,
                    "Ignoring non-string requirement entry"
                );
            }

            let rule = decoded.rule;
            if self.evaluate(&rule.trigger_condition, input) {
                let reason = self.explain(&rule.trigger_condition, input);
                tracing::debug!(rule = %rule.code, reason = %reason, "Rule matched");
                matched.push(MatchedRule::new(rule, reason));
            }
        }
        Ok(matched)
    }

    /// Evaluate a condition tree. `And([])` holds, `Or([])` does not.
    pub fn evaluate(&self, condition: &Condition, input: &NormalizedInput) -> bool {
        match condition {
            Condition::Leaf(leaf) => self.evaluate_leaf(leaf, input),
            Condition::And(children) => children.iter().all(|c| self.evaluate(c, input)),
            Condition::Or(children) => children.iter().any(|c| self.evaluate(c, input)),
        }
    }

    fn evaluate_leaf(&self, leaf: &Leaf, input: &NormalizedInput) -> bool {
        let actual = input.field(&leaf.key).unwrap_or(Value::Null);
        match &leaf.predicate {
            Predicate::Equals(expected) => values_equal(&actual, expected),
            Predicate::Compare {
                comparator,
                threshold,
                ..
            } => match (as_number(&actual), threshold) {
                (Some(actual), Some(threshold)) => comparator.holds(actual, *threshold),
                _ => false,
            },
        }
    }

    /// One `key: actual matches expected` fragment per leaf, joined by `"; "`.
    pub fn explain(&self, condition: &Condition, input: &NormalizedInput) -> String {
        condition
            .leaves()
            .into_iter()
            .map(|leaf| {
                let actual = input
                    .field(&leaf.key)
                    .map(|v| display(&v))
                    .unwrap_or_else(|| "N/A".to_string());
                format!(
                    "{}: {} matches {}",
                    leaf.key,
                    actual,
                    display(&leaf.predicate.expected())
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
