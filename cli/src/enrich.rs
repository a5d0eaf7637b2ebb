#![deny(missing_docs)]

//! # Enrich Command
//!
//! Loads an OpenAPI document and an optional generator configuration, runs the
//! enrichment and writes the enriched tree as pretty JSON.

use std::fs;
use std::path::PathBuf;

use gosrv_core::{enrich_document, ApiDocument, GeneratorConfig};

use crate::error::{CliError, CliResult};

/// Arguments for the enrich command.
#[derive(clap::Args, Debug, Clone)]
pub struct EnrichArgs {
    /// Path to the OpenAPI spec.
    #[clap(long, default_value = "docs/openapi.yaml")]
    pub spec: PathBuf,

    /// Generator configuration (YAML, camelCase keys).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Output layout: gin, go-zero or go-zero-api. Overrides the configuration.
    #[clap(long)]
    pub layout: Option<String>,

    /// Go module path. Overrides the configuration.
    #[clap(long, env = "GOSRV_MODULE_ROOT")]
    pub module_root: Option<String>,

    /// Output file. Stdout when absent.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the enrichment.
pub fn execute(args: &EnrichArgs) -> CliResult<()> {
    if !args.spec.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.spec
        )));
    }

    let yaml = fs::read_to_string(&args.spec)?;
    let doc = ApiDocument::from_yaml(&yaml)?;
    let config = load_config(args)?;

    let tree = enrich_document(&doc, &config)?;
    tracing::info!(
        models = tree.models.len(),
        groups = tree.groups.len(),
        diagnostics = tree.diagnostics.len(),
        "enrichment finished"
    );

    let json = serde_json::to_string_pretty(&tree)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            tracing::info!(path = ?path, "wrote enriched tree");
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn load_config(args: &EnrichArgs) -> CliResult<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_yaml(&fs::read_to_string(path)?)?,
        None => GeneratorConfig::default(),
    };
    if let Some(layout) = &args.layout {
        config.layout = layout.parse().map_err(CliError::General)?;
    }
    if let Some(module_root) = &args.module_root {
        config.module_root = module_root.clone();
    }
    Ok(config)
}
