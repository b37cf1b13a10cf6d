//! CLI frontend for the geoquiz region quiz.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use gq_core::GameMode;

#[derive(Parser)]
#[command(
    name = "gq",
    about = "geoquiz: learn the French départements",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding settings and history (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz session in the terminal
    Play {
        /// Game mode: point, name, choice
        #[arg(short, long)]
        mode: Option<GameMode>,

        /// Attempts per département (1-3)
        #[arg(short, long)]
        attempts: Option<u32>,

        /// Number of départements in play
        #[arg(short, long)]
        targets: Option<usize>,

        /// RNG seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show recorded sessions
    History,

    /// Show or change settings
    Settings {
        /// Attempts per département (1-3)
        #[arg(long)]
        attempts: Option<u32>,

        /// Game mode: point, name, choice
        #[arg(long)]
        mode: Option<GameMode>,

        /// Number of départements in play
        #[arg(long)]
        targets: Option<usize>,

        /// Identifiers shown for a département, e.g. `code,nom,prefecture`
        #[arg(long)]
        ids: Option<String>,

        /// Show cities on the map: on, off
        #[arg(long, value_parser = parse_switch)]
        cities: Option<bool>,

        /// Show region borders on the map: on, off
        #[arg(long, value_parser = parse_switch)]
        regions: Option<bool>,
    },

    /// List départements
    Regions {
        /// Only show départements matching this code or name
        filter: Option<String>,
    },
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got '{other}'")),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    let result = match cli.command {
        Commands::Play {
            mode,
            attempts,
            targets,
            seed,
        } => commands::play::run(
            data_dir,
            commands::play::PlayOptions {
                mode,
                attempts,
                targets,
                seed,
            },
        ),
        Commands::History => commands::history::run(data_dir),
        Commands::Settings {
            attempts,
            mode,
            targets,
            ids,
            cities,
            regions,
        } => commands::settings::run(
            data_dir,
            commands::settings::SettingsChanges {
                attempts,
                mode,
                targets,
                ids,
                cities,
                regions,
            },
        ),
        Commands::Regions { filter } => commands::regions::run(filter.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
