//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use judge::output::OutputMode;
use judge::paths;

/// judge - semantic checks against natural-language specifications
#[derive(Parser, Debug)]
#[command(
    name = "judge",
    version,
    about = "Semantic code checker that verifies implementations match specifications",
    long_about = "Verify that implementation files comply with the specifications bound to them.\n\n\
                  Rule bindings in judge.toml tie file globs to rule documents (local or remote).\n\
                  An AI reviewer checks each binding's files and reports issues."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a judge.toml in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Check files against their rule bindings
    Check {
        /// Files or directories to check
        files: Vec<String>,

        /// Check the files staged for commit
        #[arg(long, conflicts_with = "files")]
        staged: bool,
    },

    /// Show the resolved configuration
    Config,

    /// Manage the remote rule cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show version information
    Version,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove every cached remote rule
    Clear,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config_path = cli.config.unwrap_or_else(paths::judge_toml);

    match cli.command {
        Some(Command::Init { force }) => commands::init(&config_path, force, output_mode),
        Some(Command::Check { files, staged }) => {
            commands::check(&config_path, &files, staged, output_mode)
        },
        Some(Command::Config) => commands::show_config(&config_path, output_mode),
        Some(Command::Cache {
            action: CacheAction::Clear,
        }) => commands::cache_clear(&config_path, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!("{}", serde_json::json!({ "version": judge::VERSION }));
            } else {
                println!("judge v{}", judge::VERSION);
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": judge::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("judge v{}", judge::VERSION);
                println!("\nRun 'judge --help' for usage");
                println!("Run 'judge init' to get started");
            }
            Ok(())
        },
    }
}
