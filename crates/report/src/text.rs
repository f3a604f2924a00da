//! Per-component text tables of every processed step.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use drift_aggregate::SeriesAggregator;
use tracing::info;

use crate::error::ReportError;
use crate::label::RunLabel;

const SUFFIXES: [&str; 5] = ["_raw", "_short", "_long", "_slope_short", "_slope_long"];

/// Writes one row per step: step number, `YYYY-MM` label, then the five
/// series of every tracked variable. A `#` header names the columns.
pub fn write_table<W: Write>(
    out: &mut W,
    label: &RunLabel,
    aggregator: &SeriesAggregator,
) -> std::io::Result<()> {
    write!(out, "# step label")?;
    for (name, _) in aggregator.tracked() {
        for suffix in SUFFIXES {
            write!(out, " {name}{suffix}")?;
        }
    }
    writeln!(out)?;

    for i in 0..aggregator.len() {
        write!(out, "{:>6} {}", i + 1, label.month_of(i))?;
        for (_, series) in aggregator.tracked() {
            let Some(v) = series.at(i) else {
                continue;
            };
            for value in [v.raw, v.short_mean, v.long_mean, v.short_slope, v.long_slope] {
                write!(out, " {value:.6e}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes `<dir>/<stem>.txt` for `aggregator`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or file cannot be written.
#[tracing::instrument(skip(label, aggregator), fields(component = %aggregator.component()))]
pub fn write_text_file(
    dir: &Path,
    label: &RunLabel,
    aggregator: &SeriesAggregator,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(ReportError::io(dir))?;
    let path = dir.join(format!("{}.txt", label.stem(aggregator.component())));
    let file = File::create(&path).map_err(ReportError::io(&path))?;
    let mut out = BufWriter::new(file);
    write_table(&mut out, label, aggregator)
        .and_then(|()| out.flush())
        .map_err(ReportError::io(&path))?;
    info!(path = %path.display(), rows = aggregator.len(), "wrote text output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use drift_aggregate::{Component, VariableSet, WindowConfig};
    use drift_calendar::ModelMonth;

    use super::*;

    #[test]
    fn table_has_header_and_one_row_per_step() {
        let set = VariableSet::new(Component::Ice, &["hi"], &[]).unwrap();
        let mut agg = SeriesAggregator::new(set, WindowConfig::default());
        for i in 0..3 {
            agg.ingest(i, &[1.0 + i as f64]).unwrap();
        }
        let first = ModelMonth::new(5, 11).unwrap();
        let label = RunLabel::new("exo", first, first.advance(2));

        let mut buf = Vec::new();
        write_table(&mut buf, &label, &agg).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "# step label hi_raw hi_short hi_long hi_slope_short hi_slope_long"
        );
        assert!(lines[1].starts_with("     1 0005-11"));
        assert!(lines[3].starts_with("     3 0006-01"));
        assert_eq!(lines[3].split_whitespace().count(), 7);
    }
}
