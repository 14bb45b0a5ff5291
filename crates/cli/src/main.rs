//! Patchdir CLI - patchdir command

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use owo_colors::OwoColorize;
use pd_core::{Config, Mode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

mod cmd;
mod settings;
mod util;

/// Patchdir - build patch directories from files changed since a snapshot
///
/// Example:
///   patchdir -u -s storage.xml <INPUT_DIR>
///   patchdir -c -s storage.xml -t <OUT_DIR> <INPUT_DIR>
#[derive(Parser)]
#[command(name = "patchdir")]
#[command(author, version)]
#[command(group(ArgGroup::new("mode").required(true).args(["update", "compare"])))]
struct Cli {
    /// Record file names and modification times of INPUT_DIR in the storage file
    #[arg(short, long)]
    update: bool,

    /// Compare INPUT_DIR with the storage file and copy changed files to the output directory
    ///
    /// The output directory is deleted and recreated on every run.
    #[arg(short, long)]
    compare: bool,

    /// Storage file to write (update) or read (compare) [default: storage.xml]
    #[arg(short, long, value_name = "FILE")]
    storage: Option<PathBuf>,

    /// Output directory for changed files (with --compare) [default: target]
    #[arg(short = 't', long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Gitignore-style pattern to leave out of the walk (repeatable)
    #[arg(short = 'x', long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// TOML settings file with defaults for storage, out_dir and exclude
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory to process
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.update {
            Mode::Update
        } else {
            Mode::Compare
        }
    }

    /// Build the immutable run configuration: flags > settings file > defaults
    fn into_config(self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => settings::load(path)?,
            None => settings::FileSettings::default(),
        };
        let mode = self.mode();
        let overrides = settings::Overrides {
            storage: self.storage,
            out_dir: self.out_dir,
            exclude: self.exclude,
        };
        Ok(settings::build_config(mode, self.input_dir, file, overrides))
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    let config = cli.into_config()?;

    match config.mode() {
        Mode::Update => cmd::update::run(&config, quiet),
        Mode::Compare => cmd::compare::run(&config, quiet),
    }
}

fn main() -> ExitCode {
    // Missing INPUT_DIR or mode exits here with status 2
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<pd_core::Error>() {
                Some(core_err) => {
                    eprintln!("{} {}: {}", "error:".red().bold(), core_err.kind(), core_err)
                }
                None => eprintln!("{} {:#}", "error:".red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}
