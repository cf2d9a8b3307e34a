//! User-facing compliance checklist.

use crate::validation::ValidationReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checklist section a clause is filed under.
///
/// Variant order is the order sections appear in a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FixtureCount,
    Accessibility,
    PlumbingFixtures,
    SpatialRequirements,
    GeneralRequirements,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FixtureCount => "fixture_count",
            Category::Accessibility => "accessibility",
            Category::PlumbingFixtures => "plumbing_fixtures",
            Category::SpatialRequirements => "spatial_requirements",
            Category::GeneralRequirements => "general_requirements",
        }
    }

    /// Display title, e.g. `Fixture Count`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::FixtureCount => "🚽",
            Category::Accessibility => "♿",
            Category::PlumbingFixtures => "🚿",
            Category::SpatialRequirements => "📏",
            Category::GeneralRequirements => "📋",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    Measurement,
    VisualInspection,
    DocumentationReview,
}

/// Review state of a checklist item. The engine only ever produces
/// `Pending`; later states belong to a review workflow outside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ItemStatus {
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub clause_id: String,
    pub clause_number: String,
    pub title: String,
    pub requirement: String,
    pub code_reference: String,
    pub page_reference: Option<u32>,
    pub why_required: String,
    pub affected_components: Vec<String>,
    pub priority: String,
    pub status: ItemStatus,
    pub verification_method: VerificationMethod,
    #[serde(default)]
    pub compliance_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub category: Category,
    pub title: String,
    pub icon: String,
    pub items: Vec<ChecklistItem>,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub total_sections: usize,
    pub total_items: usize,
    pub critical_items: usize,
    pub coverage_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub project_info: ProjectInfo,
    pub validation_status: ValidationReport,
    pub sections: Vec<ChecklistSection>,
}

impl Checklist {
    pub fn section(&self, category: Category) -> Option<&ChecklistSection> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_titles() {
        assert_eq!(Category::FixtureCount.title(), "Fixture Count");
        assert_eq!(Category::SpatialRequirements.title(), "Spatial Requirements");
        assert_eq!(Category::Accessibility.title(), "Accessibility");
    }

    #[test]
    fn categories_sort_in_section_order() {
        let mut categories = vec![
            Category::GeneralRequirements,
            Category::Accessibility,
            Category::FixtureCount,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                Category::FixtureCount,
                Category::Accessibility,
                Category::GeneralRequirements
            ]
        );
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(
            serde_json::to_value(ItemStatus::default()).unwrap(),
            serde_json::json!("pending")
        );
    }
}
