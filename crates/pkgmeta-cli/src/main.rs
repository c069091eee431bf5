//! pkgmeta - package metadata resolver
//!
//! Usage:
//!   pkgmeta versions <reference>
//!   pkgmeta info <reference> [--version V] [--source URI]
//!   pkgmeta archive <reference> <version> [--output PATH]
//!   pkgmeta license host <locator>
//!   pkgmeta license classify <file>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pkgmeta_core::config::ResolverConfig;
use pkgmeta_core::context::ResolveContext;

#[derive(Parser)]
#[command(name = "pkgmeta")]
#[command(about = "Resolve package metadata from registries and git", long_about = None)]
struct Cli {
    /// Path to a pkgmeta.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available versions, newest first
    Versions {
        /// Registry package name or git locator
        reference: String,
    },

    /// Resolve canonical metadata
    Info {
        /// Registry package name or git locator
        reference: String,
        /// Version to resolve (defaults to latest)
        #[arg(long)]
        version: Option<String>,
        /// Source repository URI overriding the declared one
        #[arg(long)]
        source: Option<String>,
    },

    /// Download and decompress a package archive
    Archive {
        /// Registry package name or git locator
        reference: String,
        /// Version (or git tag) to fetch
        version: String,
        /// Where to write the tar (defaults to <name>-<version>.tar)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect licenses
    #[command(subcommand)]
    License(LicenseCommands),
}

#[derive(Subcommand)]
enum LicenseCommands {
    /// Ask the license service about a hosted repository (owner/repo)
    Host { locator: String },

    /// Classify the license text in a file
    Classify { file: PathBuf },
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pkgmeta=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };
    tracing::debug!("Using registry {}", config.registry_url);
    let ctx = ResolveContext::new(config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run(&ctx, cli.command))
}

async fn run(ctx: &ResolveContext, command: Commands) -> Result<()> {
    match command {
        Commands::Versions { reference } => {
            let versions = ctx.version_resolver().versions(&reference).await?;
            print_json(&json!({ "reference": reference, "versions": versions }))
        }
        Commands::Info {
            reference,
            version,
            source,
        } => {
            let source = source
                .map(|uri| uri.parse::<url::Url>())
                .transpose()
                .context("Invalid --source URI")?;
            let metadata = ctx
                .metadata_resolver()
                .resolve(&reference, version.as_deref(), source.as_ref())
                .await?;
            print_json(&serde_json::to_value(&metadata)?)
        }
        Commands::Archive {
            reference,
            version,
            output,
        } => run_archive(ctx, &reference, &version, output).await,
        Commands::License(LicenseCommands::Host { locator }) => {
            let license = ctx.license_detector().detect_from_host(&locator).await?;
            print_json(&json!({ "locator": locator, "license": license.trim() }))
        }
        Commands::License(LicenseCommands::Classify { file }) => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let license = ctx.license_detector().classify(&contents).await?;
            print_json(&json!({ "file": file, "license": license.trim() }))
        }
    }
}

async fn run_archive(
    ctx: &ResolveContext,
    reference: &str,
    version: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let archive = ctx.archive_fetcher().archive(reference, version).await?;
    let entries = archive.entry_paths()?.len();
    let output = output.unwrap_or_else(|| {
        let stem = archive
            .file_name()
            .strip_suffix(".tgz")
            .unwrap_or(archive.file_name());
        PathBuf::from(format!("{}.tar", stem))
    });
    let file_name = archive.file_name().to_string();

    std::fs::write(&output, archive.into_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_json(&json!({
        "archive": file_name,
        "output": output,
        "entries": entries,
    }))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
