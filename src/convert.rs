//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use drift_aggregate::{DriverConfig, WindowConfig, WindowSpec};
use drift_calendar::ModelMonth;
use drift_io::{ArchiveLayout, NetcdfArchive, RunMode};

use crate::config::{NetcdfToml, PathsToml, RunToml, WindowsToml};

/// Builds a [`WindowConfig`] from the TOML window configuration.
pub fn build_window_config(windows: &WindowsToml) -> Result<WindowConfig> {
    let short = WindowSpec::new(windows.short_months, windows.short_years)
        .context("invalid short window")?;
    let long =
        WindowSpec::new(windows.long_months, windows.long_years).context("invalid long window")?;
    let cfg = WindowConfig::default().with_short(short).with_long(long);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`DriverConfig`] from the TOML run configuration.
pub fn build_driver_config(run: &RunToml) -> Result<DriverConfig> {
    let start = ModelMonth::first_of_year(run.start_year).context("invalid start year")?;
    let cfg = DriverConfig::new(start)
        .with_max_steps(run.max_months)
        .with_print_interval(run.print_interval)
        .with_seek_months(run.seek_months);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the [`ArchiveLayout`] of `case_id` under the configured root.
pub fn build_layout(paths: &PathsToml, case_id: &str, rundir: bool) -> ArchiveLayout {
    let mode = if rundir {
        RunMode::RunDir
    } else {
        RunMode::Archive
    };
    ArchiveLayout::new(&paths.root, case_id).with_mode(mode)
}

/// Builds the NetCDF reader over `layout` with the configured aliases.
pub fn build_archive(layout: ArchiveLayout, netcdf: &NetcdfToml) -> NetcdfArchive {
    NetcdfArchive::new(layout)
        .with_lon_aliases(netcdf.lon_aliases.clone())
        .with_lat_aliases(netcdf.lat_aliases.clone())
}
