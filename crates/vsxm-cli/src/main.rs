//! vsxm - VS Code marketplace search & install
//!
//! Usage:
//!   vsxm search python linting                  # Top five matches
//!   vsxm install ms-python python 2024.1.0      # Download into the extensions dir
//!   vsxm call install_extension '{"publisher": "ms-python", ...}'
//!   vsxm tools                                  # Tool descriptors as JSON

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vsxm_core::config::{ConfigStore, parser};
use vsxm_core::context::AppContext;
use vsxm_core::install;
use vsxm_core::tools::{self, ExtensionEntry, InstallPayload, SearchPayload};

#[derive(Parser)]
#[command(name = "vsxm")]
#[command(about = "VS Code marketplace search & install", long_about = None)]
struct Cli {
    /// Path to vsxm.toml (defaults to <config dir>/vsxm/vsxm.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Install destination (overrides config and VSXM_EXTENSIONS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    extensions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the marketplace, best matches first
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Download and install one extension version
    Install {
        /// Publisher id (e.g. ms-python)
        publisher: String,
        /// Extension id (e.g. python)
        extension: String,
        /// Exact version to install
        version: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check that an installed artifact passes the size check
    Validate {
        /// Path to a .vsix file
        path: PathBuf,
    },

    /// Print the tool descriptors as JSON
    Tools,

    /// Invoke a tool by name with JSON arguments and print its payload
    Call {
        /// Tool name (search_extensions or install_extension)
        tool: String,
        /// JSON object with the tool arguments
        #[arg(default_value = "{}")]
        arguments: String,
    },

    /// Print the resolved configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> ExitCode {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsxm=info,vsxm_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command succeeded.
fn run(cli: Cli) -> Result<bool> {
    let ctx = load_context(cli.config, cli.extensions_dir)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run_command(&ctx, cli.command))
}

async fn run_command(ctx: &AppContext, command: Commands) -> Result<bool> {
    match command {
        Commands::Search { query, format } => {
            let ext_tools = ctx.tools()?;
            let query = query.join(" ");
            let payload = ext_tools.search_extensions(&query).await;
            print_search_result(&payload, format)?;
            Ok(payload.success)
        }
        Commands::Install {
            publisher,
            extension,
            version,
            format,
        } => {
            let ext_tools = ctx.tools()?;
            let payload = ext_tools.install_extension(&publisher, &extension, &version).await;
            print_install_result(&payload, format)?;
            Ok(payload.success)
        }
        Commands::Validate { path } => {
            let valid = install::validate(&path).await;
            if valid {
                println!("✓ {} looks like a valid package", path.display());
            } else {
                println!(
                    "✗ {} is missing or not larger than {} bytes",
                    path.display(),
                    install::MIN_ARTIFACT_BYTES
                );
            }
            Ok(valid)
        }
        Commands::Call { tool, arguments } => {
            let arguments: Value = serde_json::from_str(&arguments)
                .context("Tool arguments must be valid JSON")?;
            let ext_tools = ctx.tools()?;
            let payload = ext_tools.call(&tool, &arguments).await;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(payload["success"].as_bool().unwrap_or(false))
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tools::descriptors())?);
            Ok(true)
        }
        Commands::Config => {
            print!("{}", parser::to_toml(ctx.config())?);
            println!("# extensions dir: {}", ctx.extensions_dir().display());
            Ok(true)
        }
    }
}

fn load_context(config: Option<PathBuf>, extensions_dir: Option<PathBuf>) -> Result<AppContext> {
    let ctx = match config {
        Some(path) => AppContext::load(&ConfigStore::from_path(path))?,
        None => AppContext::with_defaults()?,
    };

    let ctx = match extensions_dir {
        Some(dir) => ctx.with_extensions_dir(dir),
        None => ctx,
    };

    tracing::debug!(
        marketplace = %ctx.base_url(),
        extensions_dir = %ctx.extensions_dir().display(),
        "context loaded"
    );
    Ok(ctx)
}

fn print_search_result(payload: &SearchPayload, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if !payload.success {
                println!(
                    "✗ {}",
                    payload.message.as_deref().unwrap_or("Search failed")
                );
                return Ok(());
            }
            if payload.extensions.is_empty() {
                println!("No extensions found");
                return Ok(());
            }
            for (i, entry) in payload.extensions.iter().enumerate() {
                print_entry(i + 1, entry);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }
    Ok(())
}

fn print_entry(rank: usize, entry: &ExtensionEntry) {
    println!(
        "{}. {}.{} v{}  ({})",
        rank, entry.publisher_id, entry.extension_id, entry.version, entry.display_name
    );
    println!(
        "   installs: {}  rating: {:.1}",
        entry.install_count, entry.average_rating
    );
    if !entry.description.is_empty() {
        println!("   {}", entry.description);
    }
    println!(
        "   vsxm install {} {} {}",
        entry.install_command.publisher_id,
        entry.install_command.extension_id,
        entry.install_command.version
    );
}

fn print_install_result(payload: &InstallPayload, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if payload.success {
                println!("✓ {}", payload.message);
            } else {
                println!("✗ {}", payload.message);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_joins_query_words() {
        let cli = Cli::try_parse_from(["vsxm", "search", "python", "linting"]).unwrap();
        match cli.command {
            Commands::Search { query, .. } => assert_eq!(query.join(" "), "python linting"),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn install_requires_version() {
        assert!(Cli::try_parse_from(["vsxm", "install", "ms-python", "python"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vsxm",
            "install",
            "ms-python",
            "python",
            "2024.1.0",
            "--extensions-dir",
            "/tmp/exts",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.extensions_dir, Some(PathBuf::from("/tmp/exts")));
    }
}
