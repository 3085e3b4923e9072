//! Point d'entrée CLI pour forest-tools

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use forest_tools::cli::{self, Commands};
use forest_tools::{Config, RunReport};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Traitements par lots des couches GeoJSON de couvert forestier
#[derive(Parser)]
#[command(name = "forest-tools")]
#[command(author, version)]
#[command(about = "Découper, regrouper, fusionner et nettoyer des fichiers GeoJSON forestiers")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sauvegarder le rapport d'exécution en JSON
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    if let Commands::CategorizeProximity {
        input_dir: None, ..
    } = cli.command
    {
        eprintln!("Please provide an input directory with GeoJSON files.");
        eprintln!("Usage: forest-tools categorize-proximity <INPUT_DIR> [OUTPUT_DIR]");
        std::process::exit(1);
    }

    let config = Config::resolve(cli.config.as_deref())?;
    let mut report = RunReport::new(cli.command.name());
    let started = Instant::now();

    info!(command = cli.command.name(), "Starting");
    cli::run(cli.command, &config, &mut report)?;

    report.set_duration(started.elapsed());
    report.finalize();
    if !cli.quiet {
        report.display();
    }
    if let Some(path) = cli.report {
        report.save_to_file(&path)?;
        info!(path = %path.display(), "Report saved");
    }
    info!("{}", report.summary());

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
