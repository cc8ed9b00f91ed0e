use anyhow::Result;
use clap::Parser;
use linefan::config::{load_config, validate_config, FanConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = "\
If <ARGS> is given, linefan runs them with /bin/sh and turns the fan once per
line the command writes to stdout. When the command exits, the duration and
line count are stored under .linefan/ and used to estimate completion the next
time the same command is run from the same directory.

Without <ARGS> lines are read from stdin, and no record is read or written
unless -R is given.";

#[derive(Parser, Debug)]
#[command(name = "linefan")]
#[command(about = "Show a spinning fan for every line read", long_about = None)]
#[command(after_help = AFTER_HELP)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Change to given directory before doing anything else
    #[arg(short = 'C', value_name = "DIR")]
    chdir: Option<PathBuf>,

    /// Clear output when done. Leave no fan trace
    #[arg(short = 'c')]
    clean: bool,

    /// Show time remaining based on N seconds total runtime (0 turns it off)
    #[arg(short = 'd', value_name = "N")]
    duration: Option<u64>,

    /// Fan speed: redraw every N lines. Lower is faster
    #[arg(short = 'e', value_name = "N")]
    every: Option<u64>,

    /// Echo every line read to the fan output
    #[arg(short = 'P')]
    echo: bool,

    /// Do not show the fan
    #[arg(short = 'q')]
    quiet: bool,

    /// Record file: written when missing, otherwise used for -t and -d
    #[arg(short = 'R', value_name = "FILE")]
    record: Option<PathBuf>,

    /// When done, overwrite the record file
    #[arg(short = 'r')]
    overwrite_record: bool,

    /// Show completion percentage based on N lines of input (0 turns it off)
    #[arg(short = 't', value_name = "N")]
    target: Option<u64>,

    /// Print TITLE before the fan; '-' uses <ARGS> as the title
    #[arg(short = 'T', value_name = "TITLE", allow_hyphen_values = true)]
    title: Option<String>,

    /// Command to run through /bin/sh
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    command: Vec<String>,
}

impl Args {
    /// Layer command-line flags over the loaded configuration
    fn apply(&self, mut config: FanConfig) -> FanConfig {
        if let Some(dir) = &self.chdir {
            config.chdir = Some(dir.clone());
        }
        config.clean |= self.clean;
        config.echo |= self.echo;
        config.quiet |= self.quiet;
        config.overwrite_record |= self.overwrite_record;
        if let Some(secs) = self.duration {
            config.duration_secs = secs;
        }
        if let Some(every) = self.every {
            config.sample_every = every;
        }
        if let Some(record) = &self.record {
            config.record = Some(record.clone());
        }
        if let Some(target) = self.target {
            config.target_lines = target;
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs share stderr with the fan, so stay quiet unless asked
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
        .init();

    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(cfg) => args.apply(cfg),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    validate_config(&config)?;
    debug!("Configuration: {:?}", config);

    match linefan::run_fan(config, args.command).await {
        Ok(code) => Ok(ExitCode::from(u8::try_from(code).unwrap_or(1))),
        Err(e) => {
            error!("{:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
