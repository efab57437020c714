//! `pulsetheme`: validate, inspect and fetch PulseUI brand files.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pulse_theme::ThemeMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulsetheme", version, about = "Authoring tool for PulseUI brand files")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check brand files and report every issue found
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the brands in a directory
    List {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Print the tokens a brand and mode resolve to
    Resolve {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        brand: Option<String>,
        /// light or dark; defaults to the OS preference
        #[arg(long)]
        mode: Option<ThemeMode>,
        /// Fill tokens the brand leaves unset from the defaults
        #[arg(long)]
        inherit: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print a brand's config as JSON
    Export {
        #[arg(long)]
        dir: PathBuf,
        id: String,
    },
    /// Validate a JSON brand document and write it into a directory
    Import {
        #[arg(long)]
        dir: PathBuf,
        file: PathBuf,
    },
    /// Fetch a brand document over HTTP and print it
    Fetch {
        id: String,
        url: String,
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> anyhow::Result<bool> {
    let output = match command {
        Command::Validate { files } => {
            let report = commands::validate(&files);
            print!("{}", report.output);
            return Ok(report.all_valid);
        }
        Command::List { dir } => commands::list(&dir)?,
        Command::Resolve {
            dir,
            brand,
            mode,
            inherit,
            json,
        } => {
            let mode = mode.unwrap_or_else(pulse_theme::detect_theme_mode);
            commands::resolve(&dir, brand.as_deref(), mode, inherit, json)?
        }
        Command::Export { dir, id } => commands::export(&dir, &id)?,
        Command::Import { dir, file } => commands::import(&dir, &file)?,
        Command::Fetch {
            id,
            url,
            timeout_secs,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::fetch(
                &id,
                &url,
                std::time::Duration::from_secs(timeout_secs),
            ))?
        }
    };
    print!("{}", output);
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
