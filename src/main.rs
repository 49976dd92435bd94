use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use budgety::config::{Config, ConfigError};
use budgety::core::LedgerStore;
use budgety::logging::init_tracing;
use budgety::session::{OutputFormat, RunReport, Session};
use clap::{Parser, Subcommand};
use tracing::info;

const DEMO_SCRIPT: &str = "\
add inc Salary 100
add exp Rent 25
list
";

#[derive(Parser)]
#[command(name = "budgety", about = "Track income, expenses and what is left")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from a script file or stdin
    Run {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Record a sample salary and rent and show the result
    Demo,
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(Path::new("config.toml")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cfg.log_filter());
    info!(id_policy = ?cfg.ledger.id_policy, "Starting budgety");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let today = chrono::Local::now().date_naive();
    let mut session = Session::new(LedgerStore::new(cfg.ledger.id_policy), format, today);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let report: RunReport = match cli.command {
        Commands::Run { file: Some(path) } => {
            let reader = BufReader::new(File::open(&path)?);
            session.run(reader, stdout.lock(), stderr.lock())?
        }
        Commands::Run { file: None } => {
            session.run(io::stdin().lock(), stdout.lock(), stderr.lock())?
        }
        Commands::Demo => {
            session.run(DEMO_SCRIPT.as_bytes(), stdout.lock(), stderr.lock())?
        }
    };

    if report.failed > 0 {
        return Err(format!("{} command(s) failed", report.failed).into());
    }
    Ok(())
}
