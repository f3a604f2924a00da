//! Check command: validate the variable lists without reading any history file.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use drift_aggregate::{SlotKind, VariableRegistry};
use drift_io::read_variable_lists;

use crate::cli::CheckArgs;
use crate::config::DriftConfig;

fn write_layout<W: Write>(out: &mut W, registry: &VariableRegistry) -> io::Result<()> {
    for entry in registry.entries() {
        let set = entry.set();
        writeln!(out, "[{}] {} slots", entry.component(), set.len())?;
        for (i, name) in set.names().iter().enumerate() {
            let kind = match set.kind(i) {
                Some(SlotKind::Coordinate) => "coordinate",
                Some(SlotKind::Raw) => "raw",
                Some(SlotKind::Derived(_)) => "derived",
                None => continue,
            };
            writeln!(out, "{i:>4}  {name:<16} {kind}")?;
        }
        writeln!(out, "  print: {}", entry.print_columns().join(" "))?;
        writeln!(out, "  plot:  {}", entry.plot().join(" "))?;
    }
    Ok(())
}

/// Validate the variable-list file against the active components.
pub fn run(args: CheckArgs) -> Result<()> {
    let _cmd = info_span!("check").entered();
    let active = args
        .components
        .require_active()
        .context("invalid variable configuration")?;
    let mut config = DriftConfig::load(args.config.as_deref())?;
    if let Some(vars) = args.vars {
        config.paths.vars = vars;
    }

    let lists = read_variable_lists(&config.paths.vars).with_context(|| {
        format!(
            "failed to read variable lists: {}",
            config.paths.vars.display()
        )
    })?;
    let registry = VariableRegistry::build(&active, &lists)
        .context("invalid variable configuration")?;
    info!(components = registry.entries().len(), "variable lists valid");

    write_layout(&mut io::stdout().lock(), &registry)?;
    Ok(())
}
