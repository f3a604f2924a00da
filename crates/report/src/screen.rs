//! Periodic progress lines on a terminal (or any [`Write`]).

use std::io::{self, Write};

use drift_aggregate::{Component, StepObserver, StepReport, VariableRegistry};
use drift_calendar::ModelMonth;

const VALUE_WIDTH: usize = 12;

/// [`StepObserver`] that prints the print-list variables of every active
/// component.
///
/// Each line starts with the 1-based step number, followed per component
/// by `raw`, short mean, long mean and long slope of each print column.
pub struct ScreenReporter<W: Write> {
    out: W,
    columns: Vec<(Component, Vec<String>)>,
}

impl<W: Write> ScreenReporter<W> {
    /// Reporter writing the print columns of `registry` to `out`.
    pub fn new(out: W, registry: &VariableRegistry) -> Self {
        let columns = registry
            .entries()
            .iter()
            .map(|e| {
                let cols = e.print_columns().into_iter().map(str::to_string).collect();
                (e.component(), cols)
            })
            .collect();
        Self { out, columns }
    }

    /// Consumes the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Column header naming each printed variable.
    pub fn header(&self) -> String {
        let mut line = format!("{:>5}", "step");
        for (component, cols) in &self.columns {
            for col in cols {
                for suffix in ["", "_short", "_long", "_trend"] {
                    let name = format!("{}:{col}{suffix}", component.short_name());
                    line.push_str(&format!(" {name:>VALUE_WIDTH$}"));
                }
            }
        }
        line
    }

    fn format_step(&self, report: &StepReport<'_>) -> String {
        let mut line = format!("{:>5}", report.index + 1);
        for (component, cols) in &self.columns {
            let agg = report
                .aggregators
                .iter()
                .find(|a| a.component() == *component);
            for col in cols {
                let values = agg.and_then(|a| a.series(col)).and_then(|s| s.at(report.index));
                let cells = match values {
                    Some(v) => [v.raw, v.short_mean, v.long_mean, v.long_slope],
                    None => [f64::NAN; 4],
                };
                for value in cells {
                    line.push_str(&format!(" {value:>VALUE_WIDTH$.4}"));
                }
            }
        }
        line
    }
}

impl<W: Write> StepObserver for ScreenReporter<W> {
    fn on_first(&mut self, month: ModelMonth) -> io::Result<()> {
        writeln!(self.out, "Date of first data read = {month}")?;
        let header = self.header();
        writeln!(self.out, "{header}")
    }

    fn on_step(&mut self, report: &StepReport<'_>) -> io::Result<()> {
        let line = self.format_step(report);
        writeln!(self.out, "{line}")
    }
}
