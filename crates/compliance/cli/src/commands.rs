//! Command implementations

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use compliance_engine::WorkflowOrchestrator;
use compliance_store::{Catalog, InMemoryCatalog, RuleStore, StoreConnector};
use compliance_types::{ComplianceError, Rule};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::Tabled;

/// Exit code for a run that aborted on invalid input or store failure.
pub const EXIT_ABORTED: u8 = 2;

/// Exit code for `--require-complete` runs whose validation is incomplete.
pub const EXIT_INCOMPLETE: u8 = 3;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Building parameters as a JSON object file (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Catalog file, overriding the configured path
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Pretty-print the workflow result
    #[arg(long)]
    pub pretty: bool,

    /// Exit non-zero when validation finds unresolved rule clauses
    #[arg(long)]
    pub require_complete: bool,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Jurisdiction to list rules for
    #[arg(short, long, default_value = "NBC")]
    pub jurisdiction: String,

    /// Catalog file, overriding the configured path
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Run the workflow once and print its result as JSON.
pub fn run(args: &RunArgs, config: &CliConfig) -> Result<ExitCode> {
    let catalog = open_catalog(args.catalog.as_deref(), config)?;
    let raw = read_parameters(&args.input)?;

    let orchestrator = WorkflowOrchestrator::with_config(catalog, config.engine.clone());
    let result = orchestrator.run_value(&raw);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("failed to serialize workflow result")?;
    println!("{}", rendered);

    match result.ensure_complete() {
        Ok(()) => {
            output::print_success(&format!("{} complete", result.workflow_id));
            Ok(ExitCode::SUCCESS)
        }
        Err(ComplianceError::ValidationIncomplete { rules }) => {
            output::print_warning(&format!(
                "{} incomplete: unresolved clauses for {}",
                result.workflow_id,
                rules.join(", ")
            ));
            if args.require_complete {
                Ok(ExitCode::from(EXIT_INCOMPLETE))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(err) => {
            output::print_error(&format!("{}: {}", result.workflow_id, err));
            Ok(ExitCode::from(EXIT_ABORTED))
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct RuleRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Jurisdiction")]
    pub jurisdiction: String,
    #[tabled(rename = "Priority")]
    pub priority: i32,
    #[tabled(rename = "Condition")]
    pub condition: String,
    #[tabled(rename = "Assemblies")]
    pub assemblies: String,
    #[tabled(rename = "Clauses")]
    pub clauses: String,
}

/// List the rules visible to a jurisdiction, highest priority first.
pub fn rules(args: &RulesArgs, config: &CliConfig) -> Result<ExitCode> {
    let catalog = open_catalog(args.catalog.as_deref(), config)?;
    let session = catalog.connect().context("failed to open catalog session")?;
    let records = session
        .query_rules_by_jurisdiction(&args.jurisdiction)
        .context("failed to query rules")?;

    let rows: Vec<RuleRow> = records
        .iter()
        .map(|record| match Rule::decode(record) {
            Ok(decoded) => RuleRow {
                code: decoded.rule.code,
                name: decoded.rule.name,
                jurisdiction: decoded.rule.jurisdiction,
                priority: decoded.rule.priority,
                condition: decoded.rule.trigger_condition.to_string(),
                assemblies: decoded.rule.required_assembly_ids.join(", "),
                clauses: decoded.rule.required_clause_ids.join(", "),
            },
            Err(err) => RuleRow {
                code: record.rule_code.clone(),
                name: record.rule_name.clone(),
                jurisdiction: record.jurisdiction.clone(),
                priority: record.priority,
                condition: format!("<malformed: {}>", err),
                assemblies: String::new(),
                clauses: String::new(),
            },
        })
        .collect();

    output::print_output(rows, args.output)?;
    Ok(ExitCode::SUCCESS)
}

fn open_catalog(path: Option<&Path>, config: &CliConfig) -> Result<InMemoryCatalog> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.catalog.path));
    let catalog = Catalog::from_path(&path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    InMemoryCatalog::from_catalog(catalog).context("failed to index catalog")
}

fn read_parameters(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("failed to read parameters from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read parameters {}", path.display()))?
    };
    serde_json::from_str(&text).context("parameters are not valid JSON")
}
