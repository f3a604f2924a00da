use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level drift configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriftConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsToml,

    /// Driver settings.
    #[serde(default)]
    pub run: RunToml,

    /// Averaging windows.
    #[serde(default)]
    pub windows: WindowsToml,

    /// NetCDF coordinate names.
    #[serde(default)]
    pub netcdf: NetcdfToml,
}

impl DriftConfig {
    /// Reads `path`, or returns the defaults if `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsToml {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_vars")]
    pub vars: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_plot_dir")]
    pub plot_dir: PathBuf,
}

impl Default for PathsToml {
    fn default() -> Self {
        Self {
            root: default_root(),
            vars: default_vars(),
            data_dir: default_data_dir(),
            plot_dir: default_plot_dir(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_vars() -> PathBuf {
    PathBuf::from("vars.in")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_plot_dir() -> PathBuf {
    PathBuf::from("plots")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_max_months")]
    pub max_months: usize,
    #[serde(default = "default_print_interval")]
    pub print_interval: usize,
    #[serde(default)]
    pub seek_months: usize,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            max_months: default_max_months(),
            print_interval: default_print_interval(),
            seek_months: 0,
        }
    }
}

fn default_start_year() -> i32 {
    1
}
fn default_max_months() -> usize {
    6000
}
fn default_print_interval() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowsToml {
    #[serde(default = "default_short_months")]
    pub short_months: usize,
    #[serde(default = "default_short_years")]
    pub short_years: f64,
    #[serde(default = "default_long_months")]
    pub long_months: usize,
    #[serde(default = "default_long_years")]
    pub long_years: f64,
}

impl Default for WindowsToml {
    fn default() -> Self {
        Self {
            short_months: default_short_months(),
            short_years: default_short_years(),
            long_months: default_long_months(),
            long_years: default_long_years(),
        }
    }
}

fn default_short_months() -> usize {
    12
}
fn default_short_years() -> f64 {
    1.0
}
fn default_long_months() -> usize {
    120
}
fn default_long_years() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetcdfToml {
    #[serde(default = "default_lon_aliases")]
    pub lon_aliases: Vec<String>,
    #[serde(default = "default_lat_aliases")]
    pub lat_aliases: Vec<String>,
}

impl Default for NetcdfToml {
    fn default() -> Self {
        Self {
            lon_aliases: default_lon_aliases(),
            lat_aliases: default_lat_aliases(),
        }
    }
}

fn default_lon_aliases() -> Vec<String> {
    vec!["lon".to_string(), "longitude".to_string()]
}
fn default_lat_aliases() -> Vec<String> {
    vec!["lat".to_string(), "latitude".to_string()]
}
