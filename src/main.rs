use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod error;
mod models;
mod report;
mod server;

use error::ReportError;

#[derive(Parser)]
#[command(name = "moodle-report")]
#[command(about = "Participation report generator for Moodle activity logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the participation report for an exported activity log
    Report {
        /// Path to the exported CSV log
        log: PathBuf,
    },
    /// Serve the upload form and render reports over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Invoked with no command at all: show usage and leave without failing.
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    match command {
        Commands::Report { log } => {
            if let Err(err) = run_report(&log) {
                eprintln!("Erro ao processar arquivo de log. Arquivo inválido?");
                eprintln!("{err}");
                process::exit(err.exit_code());
            }
        }
        Commands::Serve { bind } => {
            if let Err(err) = server::serve(bind).await {
                eprintln!("Erro ao iniciar o servidor: {err:#}");
                process::exit(74);
            }
        }
    }
}

fn run_report(log: &Path) -> Result<(), ReportError> {
    let file = File::open(log)?;
    let participation = aggregate::participation_stats(BufReader::new(file))?;
    print!("{}", report::build_report(&participation));
    Ok(())
}
