mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "calfeed")]
#[command(about = "Merge public calendar feeds into a single JSON event list")]
struct Cli {
    /// Show debug logging (skipped records, requests)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every feed and write the merged events file
    Build {
        /// Config file (defaults to ./calfeed.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the JSON (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat this RFC 3339 instant as "now" when windowing
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Keep events starting up to this many days ago
        #[arg(long)]
        past_days: Option<i64>,

        /// Keep events starting up to this many days ahead
        #[arg(long)]
        future_days: Option<i64>,
    },
    /// List the configured feeds
    Sources {
        /// Config file (defaults to ./calfeed.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            config,
            output,
            now,
            past_days,
            future_days,
        } => {
            commands::build::run(commands::build::BuildOptions {
                config,
                output,
                now,
                past_days,
                future_days,
            })
            .await
        }
        Commands::Sources { config } => commands::sources::run(config.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str("calfeed")
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Could not initialize logging: {e}");
    }
}
