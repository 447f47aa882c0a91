pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use freightrank_core::config::{AppConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "freightrank",
    about = "Freight forwarder ranking CLI",
    long_about = "Rank freight forwarders against weighted cost, time, reliability and risk criteria.",
    after_help = "Examples:\n  freightrank rank --carriers carriers.json --preset emergency\n  freightrank presets\n  freightrank reweight --preset balanced --criterion cost --value 0.6"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a freightrank.toml file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank carriers from a JSON file and print the ordered candidates")]
    Rank {
        #[arg(long, help = "JSON array of carrier profiles")]
        carriers: PathBuf,
        #[arg(long, help = "costOptimized|timeOptimized|emergency|balanced|default")]
        preset: Option<String>,
        #[arg(long, help = "dynamic|neutrosophic_topsis|closeness_topsis")]
        strategy: Option<String>,
        #[arg(long, help = "Force emergency mode regardless of preset")]
        emergency: bool,
        #[arg(long, help = "Seed for reproducible rate and indeterminacy draws")]
        seed: Option<u64>,
    },
    #[command(about = "List the built-in weight presets")]
    Presets,
    #[command(about = "Change one preset weight and renormalize the rest")]
    Reweight {
        #[arg(long)]
        preset: String,
        #[arg(long, help = "cost|time|reliability|risk|experience")]
        criterion: String,
        #[arg(long)]
        value: f64,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Rank { carriers, preset, strategy, emergency, seed } => {
            commands::rank::run(commands::rank::RankArgs {
                config_path: cli.config,
                carriers,
                preset,
                strategy,
                emergency,
                seed,
            })
        }
        Command::Presets => commands::presets::run(),
        Command::Reweight { preset, criterion, value } => {
            commands::reweight::run(&preset, &criterion, value)
        }
        Command::Config => commands::config::run(cli.config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the JSON payload. Repeated calls
/// keep the first subscriber.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
