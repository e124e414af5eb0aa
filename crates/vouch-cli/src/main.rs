mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::vouches::VouchesSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vouchbot",
    about = "Discord vouch bot: collect star-rated reviews and replay them on demand",
    version,
    propagate_version = true
)]
struct Cli {
    /// Bot directory holding config.json and the vouch file (default: auto-detect)
    #[arg(long, global = true, env = "VOUCH_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/config.json)
    #[arg(long, global = true, env = "VOUCH_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register slash commands and serve the interactions endpoint
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Register the slash commands with the guild and exit
    Register,

    /// Inspect stored vouches
    Vouches {
        #[command(subcommand)]
        subcommand: VouchesSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let config_path = cli
        .config
        .unwrap_or_else(|| vouch_core::paths::config_path(&root));

    let result = match cli.command {
        Commands::Serve { port } => cmd::serve::run(&root, &config_path, port),
        Commands::Register => cmd::register::run(&config_path, cli.json),
        Commands::Vouches { subcommand } => {
            cmd::vouches::run(&root, &config_path, subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
