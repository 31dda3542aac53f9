//! `agk` - scaffold AgenticGoKit multi-agent projects.
//!
//! ```bash
//! agk create --config research-bot.toml --output ./projects
//! agk validate --config research-bot.toml
//! agk models --provider ollama
//! ```

mod cli;

use agk_scaffold::validation;
use agk_scaffold::{EmbeddingRegistry, Generator, ProjectConfig};
use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    agk_telemetry::init_telemetry_with_format("agk", cli.log_format.into())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    match cli.command {
        Commands::Create { config, output, name } => create(&config, &output, name),
        Commands::Validate { config, json } => validate(&config, json),
        Commands::Models { provider } => {
            print!("{}", models(&EmbeddingRegistry::builtin(), provider.as_deref()));
            Ok(())
        }
    }
}

fn load_config(path: &Path, name: Option<String>) -> Result<ProjectConfig> {
    let mut config = ProjectConfig::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    if let Some(name) = name {
        config.name = name;
    }
    Ok(config)
}

fn create(config_path: &Path, output: &Path, name: Option<String>) -> Result<()> {
    let config = load_config(config_path, name)?;
    let summary = Generator::default()
        .generate(&config, output)
        .with_context(|| format!("failed to generate project '{}'", config.name))?;

    for warning in &summary.warnings {
        println!("warning: {warning}");
    }
    println!("Created {} ({} files)", summary.root.display(), summary.files.len());
    println!();
    println!("Next steps:");
    println!("  cd {}", summary.root.display());
    if summary.files.iter().any(|f| f == Path::new("setup.sh")) {
        println!("  ./setup.sh");
    }
    println!("  go mod tidy");
    println!("  go run . -m \"Hello\"");
    Ok(())
}

fn validate(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path, None)?;
    let registry = EmbeddingRegistry::builtin();
    let (sanitized, result) = validation::check(&config, &registry);

    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    for error in &result.errors {
        println!("error: {error}");
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&sanitized)?);
    }
    if !result.is_valid() {
        bail!("{} validation error(s) in {}", result.errors.len(), config_path.display());
    }
    println!("{} is valid", config_path.display());
    Ok(())
}

fn models(registry: &EmbeddingRegistry, provider: Option<&str>) -> String {
    let mut out = String::new();
    for record in registry.records() {
        if provider.is_some_and(|p| !record.provider.eq_ignore_ascii_case(p)) {
            continue;
        }
        let marker = if record.recommended { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<8} {:<32} {:>5}  {}\n",
            record.provider, record.model, record.dimensions, record.notes
        ));
    }
    out
}
