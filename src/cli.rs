use std::path::PathBuf;

use clap::{Parser, Subcommand};

use drift_aggregate::{AggregateError, Component};

/// Drift monitor for coupled climate-model runs.
#[derive(Parser)]
#[command(
    name = "drift",
    version,
    about = "Rolling global means and trends from monthly model history files"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Stream a case's history files and report averages and trends.
    Run(RunArgs),
    /// Validate the variable-list file and print each component's slots.
    Check(CheckArgs),
}

/// Component switches shared by all subcommands.
#[derive(clap::Args)]
pub struct ComponentArgs {
    /// Read atmosphere (cam) history files.
    #[arg(long)]
    pub cam: bool,

    /// Read sea-ice (cice) history files.
    #[arg(long)]
    pub cice: bool,

    /// Read land (clm) history files.
    #[arg(long)]
    pub clm: bool,
}

impl ComponentArgs {
    /// Activated components in fixed processing order.
    pub fn active(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| match c {
                Component::Atmosphere => self.cam,
                Component::Ice => self.cice,
                Component::Land => self.clm,
            })
            .collect()
    }

    /// Activated components; at least one is required.
    pub fn require_active(&self) -> Result<Vec<Component>, AggregateError> {
        let active = self.active();
        if active.is_empty() {
            return Err(AggregateError::NoComponents);
        }
        Ok(active)
    }
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Case identifier; prefixes every history file name.
    pub case_id: String,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model year of the first month to read.
    #[arg(short = 'y', long = "start-year")]
    pub start_year: Option<i32>,

    /// Maximum number of months to process.
    #[arg(short = 'n', long = "max-months")]
    pub max_months: Option<usize>,

    /// Print a progress line every this many months.
    #[arg(short = 'p', long = "print-interval")]
    pub print_interval: Option<usize>,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// Read from `<root>/rundir/<case>/run` instead of the archive.
    #[arg(long)]
    pub rundir: bool,

    /// Skip writing plots.
    #[arg(long)]
    pub noplots: bool,

    /// Write per-component text tables and a JSON summary.
    #[arg(long)]
    pub print2data: bool,

    /// Override the variable-list file from config.
    #[arg(long)]
    pub vars: Option<PathBuf>,

    /// Override the archive root from config.
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// Override the variable-list file from config.
    #[arg(long)]
    pub vars: Option<PathBuf>,
}
