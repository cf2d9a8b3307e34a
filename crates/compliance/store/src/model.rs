use crate::{StoreError, StoreResult};
use compliance_types::{Assembly, Clause, RuleRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Full catalog contents: rules, assemblies and clauses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
    #[serde(default)]
    pub assemblies: Vec<Assembly>,
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

impl Catalog {
    /// Load a catalog file. `.json` files are read as JSON, anything else
    /// as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        tracing::info!(
            path = %path.display(),
            rules = catalog.rules.len(),
            assemblies = catalog.assemblies.len(),
            clauses = catalog.clauses.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> StoreResult<Self> {
        let catalog: Catalog =
            serde_yaml::from_str(yaml).map_err(|e| StoreError::Serialization(e.to_string()))?;
        catalog.check_unique_codes()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> StoreResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        catalog.check_unique_codes()?;
        Ok(catalog)
    }

    fn check_unique_codes(&self) -> StoreResult<()> {
        ensure_unique("rule", self.rules.iter().map(|r| r.rule_code.as_str()))?;
        ensure_unique(
            "assembly",
            self.assemblies.iter().map(|a| a.assembly_code.as_str()),
        )?;
        ensure_unique("clause", self.clauses.iter().map(|c| c.clause_code.as_str()))
    }
}

fn ensure_unique<'a>(kind: &str, codes: impl Iterator<Item = &'a str>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for code in codes {
        if !seen.insert(code) {
            return Err(StoreError::Conflict(format!(
                "duplicate {} code {}",
                kind, code
            )));
        }
    }
    Ok(())
}
