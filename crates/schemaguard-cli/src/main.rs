use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemaguard_core::{fingerprint, Config, Report, SchemaAst};
use schemaguard_engine::{lower, SafetyChecker};

/// SchemaGuard - backward-compatibility gate for schema changes
#[derive(Parser)]
#[command(name = "schemaguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemaguard.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that moving from the previous schema to the current one is safe
    Check {
        /// Parsed AST (JSON) of the deployed schema
        #[arg(short, long)]
        previous: PathBuf,

        /// Parsed AST (JSON) of the proposed schema
        #[arg(short = 'n', long)]
        current: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Show the table and column every model and field resolves to
    Identities {
        /// Parsed AST (JSON) of a schema
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new("schemaguard.toml").exists() {
        Config::from_file(Path::new("schemaguard.toml")).context("Failed to load schemaguard.toml")?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!("{} field identity: {:?}", "Using".cyan(), config.field_identity);
    }

    match cli.command {
        Commands::Check { previous, current, output, markdown } => {
            check_command(config, &previous, &current, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Identities { schema } => identities_command(&schema),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Read a schema file, returning its AST and content fingerprint
fn load_schema(path: &Path) -> Result<(SchemaAst, String)> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    let ast = SchemaAst::from_json(&contents)
        .with_context(|| format!("Failed to parse schema {}", path.display()))?;

    Ok((ast, fingerprint(contents.as_bytes())))
}

/// Check command - evaluate the schema transition
fn check_command(
    config: Config,
    previous: &Path,
    current: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Loading previous schema from:".cyan(), previous.display());
        eprintln!("{} {}", "Loading current schema from:".cyan(), current.display());
    }

    tracing::info!(
        previous = %previous.display(),
        current = %current.display(),
        "checking schema transition"
    );

    let (prev_ast, prev_fingerprint) = load_schema(previous)?;
    let (current_ast, current_fingerprint) = load_schema(current)?;

    let outcome = SafetyChecker::new(config)
        .check(&prev_ast, &current_ast)
        .context("Schema snapshots could not be compared")?;

    let report = outcome.into_report().with_metadata(serde_json::json!({
        "previous": { "path": previous.display().to_string(), "sha256": prev_fingerprint },
        "current": { "path": current.display().to_string(), "sha256": current_fingerprint },
    }));

    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("Failed to write markdown report {}", md_path.display()))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if !report.is_safe() {
        std::process::exit(1);
    }

    Ok(())
}

/// Identities command - print resolved physical names
fn identities_command(path: &Path) -> Result<()> {
    let (ast, _) = load_schema(path)?;
    let snapshot = lower(&ast).context("Schema could not be resolved")?;

    for model in &snapshot.models {
        let mut header = format!("{} -> {}", model.name.bold(), model.physical_name.green());
        if model.ignored {
            header.push_str(&format!(" {}", "[ignored]".yellow()));
        }
        println!("{}", header);

        for field in &model.fields {
            let target = if field.relation {
                "(relation)".dimmed().to_string()
            } else {
                field.physical_name.green().to_string()
            };

            let mut flags = Vec::new();
            if field.ignored {
                flags.push("ignored");
            }
            if field.optional {
                flags.push("optional");
            }
            if field.has_default {
                flags.push("default");
            }

            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", ")).yellow().to_string()
            };

            println!("  {}: {} -> {}{}", field.name, field.field_type, target, flags);
        }
    }

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Safety Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Models checked: {}", report.summary.models_checked);
    println!("  Fields checked: {}", report.summary.fields_checked);

    if report.summary.total > 0 {
        println!("  Issues:         {}", report.summary.total.to_string().red().bold());
    } else {
        println!("  Issues:         {}", report.summary.total.to_string().green());
    }
    println!();

    if report.issues.is_empty() {
        println!("{}", "✓ Schema change is backward-compatible".green().bold());
    } else {
        println!("{}", "Issues:".bold());
        for issue in &report.issues {
            println!("  [{}] {}", issue.kind.as_str().red().bold(), issue.subject());
            println!("    {}", issue.message);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Schema Safety Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Models checked: {}\n", report.summary.models_checked));
    md.push_str(&format!("- Fields checked: {}\n", report.summary.fields_checked));
    md.push_str(&format!("- Issues: {}\n", report.summary.total));
    for (code, count) in &report.summary.by_kind {
        md.push_str(&format!("  - `{}`: {}\n", code, count));
    }
    md.push('\n');

    if report.issues.is_empty() {
        md.push_str("✅ **Schema change is backward-compatible**\n");
    } else {
        md.push_str("## Issues\n\n");

        for issue in &report.issues {
            md.push_str(&format!("### ❌ {} - `{}`\n\n", issue.kind, issue.subject()));
            md.push_str(&format!("{}\n\n", issue.message));
            md.push_str(&format!("**Physical name:** `{}`\n\n", issue.physical_name));
        }
    }

    md
}
