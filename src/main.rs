use anyhow::{Context, Result};
use aqua_registration::{export_roster, roster_summary, AppConfig, Roster, Store};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aqua-registration")]
#[command(about = "Swimming competition registration manager", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(long, env = "AQUA_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Ui,
    /// Print the registered swimmers
    List,
    /// Write the roster to a dated CSV file
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the plain-text roster summary
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Ui);
    init_logging(&config, cli.verbose, matches!(command, Commands::Ui))?;

    let store = Store::open(&config.storage.database_path)?;

    match command {
        Commands::Ui => run_ui_mode(&store, &config)?,
        Commands::List => run_list(&store),
        Commands::Export { output } => {
            let dir = output.unwrap_or_else(|| config.export.output_dir.clone());
            let swimmers = Roster::new(&store).swimmers();
            let path = export_roster(&dir, &swimmers, Local::now().date_naive())?;
            println!("✓ Exported {} registrations to {}", swimmers.len(), path.display());
        }
        Commands::Summary => {
            println!("{}", roster_summary(&Roster::new(&store).swimmers()));
        }
    }

    Ok(())
}

/// Logs go to stderr, except in UI mode where the terminal belongs to the
/// interface and they go to the configured log file.
fn init_logging(config: &AppConfig, verbose: bool, to_file: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("aqua_registration={}", log_level).into());

    if to_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.storage.log_path)
            .with_context(|| format!("Failed to open log file {}", config.storage.log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn run_list(store: &Store) {
    let swimmers = Roster::new(store).swimmers();
    if swimmers.is_empty() {
        println!("No registrations yet.");
        return;
    }

    println!("Registrations ({})", swimmers.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for s in &swimmers {
        println!(
            "{:<24} {:>4}  {:<24} {:<24} {:>8}  {}",
            s.name,
            s.birth_year,
            s.competition,
            s.event,
            s.entry_time,
            s.registration_date()
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: &Store, config: &AppConfig) -> Result<()> {
    let mut app = aqua_registration::ui::App::new(store, config);
    aqua_registration::ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: &Store, _config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: aqua-registration list | export | summary");
    std::process::exit(1);
}
