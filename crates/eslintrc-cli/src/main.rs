mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eslintrc")]
#[command(about = "Inspect and validate ESLint-style configuration files", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (searched upward from the current directory if omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a config file, reporting suspicious declarations
    Check {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print a configuration
    Print {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: DocumentFormat,

        /// Inline file-relative `extends` entries before printing
        #[arg(long)]
        resolved: bool,

        /// Print the built-in front-end configuration instead of a file
        #[arg(long, conflicts_with = "resolved")]
        builtin: bool,
    },

    /// Show the severity and options of one rule
    Rule {
        /// Rule id, e.g. `max-len` or `react/jsx-filename-extension`
        name: String,

        /// Look the rule up in the built-in front-end configuration
        #[arg(long)]
        builtin: bool,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DocumentFormat {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Check { format } => commands::check::run(cli.config, format)?,
        Commands::Print {
            format,
            resolved,
            builtin,
        } => commands::print::run(cli.config, format, resolved, builtin)?,
        Commands::Rule { name, builtin } => commands::rule::run(cli.config, &name, builtin)?,
    }

    Ok(())
}
