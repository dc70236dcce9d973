//! `lexis`: sentence segmentation and morphological analysis from the shell.

mod commands;
mod config;
mod pipeline;

use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::commands::Command;
use crate::config::Config;

#[derive(Parser)]
#[command(author, version, about = "Rule-based sentence segmentation and morphological analysis")]
pub struct Cli {
    /// More output per occurrence (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// JSON snapshot backing the store
    #[arg(long, value_name = "FILE", global = true)]
    store: Option<PathBuf>,

    /// Compiled table archive to analyze with
    #[arg(long, value_name = "FILE", global = true)]
    tables: Option<PathBuf>,

    /// Never write results to the store
    #[arg(long, global = true)]
    no_store: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(verbose: u8, config: &Config) -> Result<()> {
    let level = match verbose {
        0 => config.logging.level_filter()?.unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config)?;
    commands::execute(cli, config)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
