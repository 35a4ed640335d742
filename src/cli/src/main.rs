//! Trino ACL - Command-line access evaluator
//!
//! Evaluates principals against a Trino file-based access-control document:
//! - Effective catalog/schema/table access as JSON
//! - Document validation with literal-fallback pattern report
//! - Normalized document output, optionally in the `data` envelope

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod commands;
mod config;

use config::AclConfig;

/// Trino ACL CLI
#[derive(Parser)]
#[command(name = "trino-acl")]
#[command(about = "Evaluate Trino file-based access-control rules")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "TRINO_ACL_CONFIG")]
    config: Option<PathBuf>,

    /// Rules document (overrides config)
    #[arg(short, long, env = "TRINO_ACL_RULES")]
    rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute effective access for a principal and resource
    Evaluate {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Group memberships, comma separated
        #[arg(short, long, value_delimiter = ',')]
        groups: Vec<String>,

        /// Role memberships, comma separated
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,

        /// Catalog name
        #[arg(long)]
        catalog: String,

        /// Schema name
        #[arg(long)]
        schema: Option<String>,

        /// Table name (requires --schema)
        #[arg(long)]
        table: Option<String>,
    },

    /// Evaluate a JSON access request
    Check {
        /// Request file, or `-` for stdin
        #[arg(default_value = "-")]
        request: PathBuf,
    },

    /// Load the rules document and report counts and literal patterns
    Validate,

    /// Print the normalized rules document
    Dump {
        /// Wrap the document in a top-level `data` object
        #[arg(short, long)]
        wrap: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AclConfig::load(path)?,
        None => AclConfig::default(),
    };

    // Apply CLI overrides
    if let Some(rules) = cli.rules {
        config.rules.path = rules;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.to_ascii_lowercase().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(path) = &cli.config {
        info!("Loaded configuration from {:?}", path);
    }

    let rules = commands::load_rules(&config.rules.path).await?;

    match cli.command {
        Command::Evaluate {
            user,
            groups,
            roles,
            catalog,
            schema,
            table,
        } => {
            let request = commands::build_request(
                &user,
                &groups,
                &roles,
                &catalog,
                schema.as_deref(),
                table.as_deref(),
            );
            let access = commands::evaluate(rules, &request);
            println!("{}", serde_json::to_string_pretty(&access)?);
        }
        Command::Check { request } => {
            let request = commands::read_request(&request)?;
            let access = commands::evaluate(rules, &request);
            println!("{}", serde_json::to_string_pretty(&access)?);
        }
        Command::Validate => {
            let report = commands::ValidationReport::from_rules(&rules);
            println!("{}", report);
        }
        Command::Dump { wrap } => {
            println!("{}", commands::dump(&rules, wrap || config.rules.wrap_output)?);
        }
    }

    Ok(())
}
