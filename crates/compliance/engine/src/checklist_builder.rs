//! Checklist builder: groups collected clauses into categorized sections.

use compliance_types::{
    Category, Checklist, ChecklistItem, ChecklistSection, Clause, ClauseCollection,
    ComponentExpansion, ItemStatus, ProjectInfo, ValidationReport, VerificationMethod,
};
use std::collections::BTreeMap;

const DEFAULT_REASON: &str = "Required by building code";

/// Keyword tables, checked in order against lower-cased text. The first row
/// with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(&[&str], Category)] = &[
    (&["water closet", "toilet"], Category::FixtureCount),
    (&["accessible", "grab bar"], Category::Accessibility),
    (&["lavatory", "sink"], Category::PlumbingFixtures),
    (&["door", "clearance"], Category::SpatialRequirements),
];

const VERIFICATION_KEYWORDS: &[(&[&str], VerificationMethod)] = &[
    (&["dimension", "clearance"], VerificationMethod::Measurement),
    (&["provided", "shall be"], VerificationMethod::VisualInspection),
];

fn first_match<T: Copy>(table: &[(&[&str], T)], text: &str) -> Option<T> {
    let text = text.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, result)| *result)
}

/// Category for a clause, from its title.
pub fn categorize(clause: &Clause) -> Category {
    first_match(CATEGORY_KEYWORDS, &clause.clause_title).unwrap_or(Category::GeneralRequirements)
}

/// Verification method for a clause, from its text.
pub fn verification_method(clause: &Clause) -> VerificationMethod {
    first_match(VERIFICATION_KEYWORDS, &clause.clause_text)
        .unwrap_or(VerificationMethod::DocumentationReview)
}

#[derive(Clone, Debug, Default)]
pub struct ChecklistBuilder;

impl ChecklistBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the checklist. Sections follow [`Category`] order; empty
    /// categories are left out.
    pub fn build(
        &self,
        collection: &ClauseCollection,
        expansion: &ComponentExpansion,
        validation: &ValidationReport,
    ) -> Checklist {
        let mut grouped: BTreeMap<Category, Vec<ChecklistItem>> = BTreeMap::new();
        for clause in &collection.clauses {
            grouped
                .entry(categorize(clause))
                .or_default()
                .push(self.item(clause, collection, expansion));
        }

        let sections: Vec<ChecklistSection> = grouped
            .into_iter()
            .map(|(category, items)| ChecklistSection {
                category,
                title: category.title(),
                icon: category.icon().to_string(),
                total_items: items.len(),
                items,
            })
            .collect();

        let total_items = sections.iter().map(|s| s.total_items).sum();
        let critical_items = sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|item| item.priority == "critical")
            .count();

        tracing::debug!(
            sections = sections.len(),
            items = total_items,
            critical = critical_items,
            "Checklist built"
        );

        Checklist {
            project_info: ProjectInfo {
                total_sections: sections.len(),
                total_items,
                critical_items,
                coverage_score: validation.coverage_map.coverage_percentage,
            },
            validation_status: validation.clone(),
            sections,
        }
    }

    fn item(
        &self,
        clause: &Clause,
        collection: &ClauseCollection,
        expansion: &ComponentExpansion,
    ) -> ChecklistItem {
        // Direct entries precede linkage entries, so a rule's reason wins.
        let why_required = collection
            .provenance_of(&clause.clause_code)
            .next()
            .and_then(|entry| entry.reason())
            .unwrap_or(DEFAULT_REASON)
            .to_string();

        let affected_components = clause
            .applies_to_components
            .iter()
            .filter(|c| expansion.required_components.contains(*c))
            .cloned()
            .collect();

        ChecklistItem {
            clause_id: clause.clause_code.clone(),
            clause_number: clause.clause_number.clone(),
            title: clause.clause_title.clone(),
            requirement: clause.clause_text.clone(),
            code_reference: clause.code_reference(),
            page_reference: clause.page_number,
            why_required,
            affected_components,
            priority: clause.enforcement_level.clone(),
            status: ItemStatus::Pending,
            verification_method: verification_method(clause),
            compliance_notes: String::new(),
        }
    }
}
