//! Run command: stream a case's history files and report.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::{info_span, warn};

use drift_aggregate::{
    DriverConfig, RunSummary, StepSource, StopReason, TimestepDriver, VariableRegistry,
};
use drift_io::{ArchiveLayout, GridInfo, NetcdfArchive, peek_grid, read_variable_lists};
use drift_report::{RunLabel, RunReport, ScreenReporter, write_plots, write_text_file};

use crate::cli::RunArgs;
use crate::config::DriftConfig;
use crate::convert;

/// Applies command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut DriftConfig, args: &RunArgs) {
    if let Some(root) = &args.root {
        config.paths.root = root.clone();
    }
    if let Some(vars) = &args.vars {
        config.paths.vars = vars.clone();
    }
    if let Some(y) = args.start_year {
        config.run.start_year = y;
    }
    if let Some(n) = args.max_months {
        config.run.max_months = n;
    }
    if let Some(p) = args.print_interval {
        config.run.print_interval = p;
    }
}

/// First file within the seek range of the first active component.
fn first_grid(
    archive: &NetcdfArchive,
    registry: &VariableRegistry,
    driver: &DriverConfig,
) -> Option<GridInfo> {
    let component = registry.components().into_iter().next()?;
    let month = (0..=driver.seek_months())
        .map(|k| driver.start().advance(k))
        .find(|m| archive.has_step(component, *m))?;
    let path = archive.layout().history_file(component, month);
    match peek_grid(&path, &archive.lon_aliases(), &archive.lat_aliases()) {
        Ok(grid) => Some(grid),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read grid resolution");
            None
        }
    }
}

fn write_banner<W: Write>(
    out: &mut W,
    layout: &ArchiveLayout,
    registry: &VariableRegistry,
    driver: &DriverConfig,
    grid: Option<GridInfo>,
) -> io::Result<()> {
    let rule = "~".repeat(56);
    writeln!(out, "{rule}")?;
    writeln!(out, "{:~^56}", " drift trend analysis ")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "=== File series descriptors ===")?;
    writeln!(
        out,
        "{} {} {}",
        layout.case_id(),
        driver.start().year(),
        layout.mode().dir_name()
    )?;
    for entry in registry.entries() {
        let component = entry.component();
        writeln!(out, "{}", layout.history_dir(component).display())?;
        let names: Vec<&str> = entry.set().raw_names().collect();
        writeln!(out, "{component} variables: {}", names.join(" "))?;
    }
    writeln!(out, "=== Resolution ===")?;
    match grid {
        Some(g) => {
            writeln!(out, "nlon  {}", g.nlon)?;
            writeln!(out, "nlat  {}", g.nlat)?;
            if let Some(nlev) = g.nlev {
                writeln!(out, "nlev  {nlev}")?;
            }
        }
        None => writeln!(out, "unknown (no history file found)")?,
    }
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "{:=^40}", "  starting time loop  ")?;
    writeln!(out, "{}", "=".repeat(40))
}

fn write_closing<W: Write>(
    out: &mut W,
    layout: &ArchiveLayout,
    registry: &VariableRegistry,
    summary: &RunSummary,
) -> io::Result<()> {
    let Some(last) = summary.last else {
        return Ok(());
    };
    writeln!(out, "Date of last data read = {last}")?;
    writeln!(out, "Last files read:")?;
    for component in registry.components() {
        writeln!(out, "{}", layout.history_file(component, last).display())?;
    }
    Ok(())
}

/// Run the streaming analysis.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("run", case = %args.case_id).entered();

    // 1. Resolve configuration before touching any history file
    let active = args
        .components
        .require_active()
        .context("invalid variable configuration")?;
    let mut config = DriftConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    let windows = convert::build_window_config(&config.windows)?;
    let driver_cfg = convert::build_driver_config(&config.run)?;
    let lists = read_variable_lists(&config.paths.vars).with_context(|| {
        format!(
            "failed to read variable lists: {}",
            config.paths.vars.display()
        )
    })?;
    let registry = VariableRegistry::build(&active, &lists)
        .context("invalid variable configuration")?;

    let layout = convert::build_layout(&config.paths, &args.case_id, args.rundir);
    let archive = convert::build_archive(layout.clone(), &config.netcdf);
    let grid = first_grid(&archive, &registry, &driver_cfg);
    let stdout = io::stdout();
    write_banner(&mut stdout.lock(), &layout, &registry, &driver_cfg, grid)?;

    // 2. Stream months
    let mut driver = TimestepDriver::new(archive, &registry, windows, driver_cfg)
        .context("failed to set up the driver")?;
    let mut reporter = ScreenReporter::new(stdout.lock(), &registry);
    let summary = driver.run(&mut reporter).context("aggregation failed")?;
    drop(reporter);

    if summary.stop == StopReason::NoData {
        bail!(
            "no history files found for case {} from {}",
            args.case_id,
            config.run.start_year
        );
    }
    write_closing(&mut stdout.lock(), &layout, &registry, &summary)?;

    let Some(label) = RunLabel::from_summary(&args.case_id, &summary) else {
        return Ok(());
    };

    // 3. Outputs
    if args.print2data {
        println!("Printing to text file");
        for agg in driver.aggregators() {
            write_text_file(&config.paths.data_dir, &label, agg)?;
        }
        RunReport::new(&args.case_id, &summary, driver.aggregators())
            .write_json(&config.paths.data_dir, &label)?;
    }

    if args.noplots {
        println!("Plotting routine skipped per --noplots option");
    } else {
        for entry in registry.entries() {
            let Some(agg) = driver.aggregator(entry.component()) else {
                continue;
            };
            for path in write_plots(&config.paths.plot_dir, &label, entry, agg)? {
                println!("    created {}", path.display());
            }
        }
    }
    Ok(())
}
