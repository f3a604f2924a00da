//! Timestep driver: walks calendar months, reads every active component and
//! feeds the aggregators until data or the step budget runs out.

use std::io;

use drift_calendar::ModelMonth;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::aggregator::SeriesAggregator;
use crate::error::{AggregateError, DriverError, SourceError};
use crate::registry::VariableRegistry;
use crate::spatial::area_weighted_mean;
use crate::variables::Component;
use crate::window::WindowConfig;

/// Fields of one component at one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFields {
    /// Longitude centres (degrees).
    pub lon: Vec<f64>,
    /// Latitude centres (degrees).
    pub lat: Vec<f64>,
    /// One entry per requested name; `None` if the file lacks the variable.
    pub fields: Vec<Option<Vec<f64>>>,
}

/// Supplier of per-month gridded fields.
pub trait StepSource {
    /// Returns `true` if `component` has data for `month`.
    fn has_step(&self, component: Component, month: ModelMonth) -> bool;

    /// Reads the fields `names` of `component` at `month`.
    fn read_step(
        &self,
        component: Component,
        month: ModelMonth,
        names: &[&str],
    ) -> Result<StepFields, SourceError>;
}

/// Snapshot handed to a [`StepObserver`] after a processed step.
#[derive(Debug, Clone, Copy)]
pub struct StepReport<'a> {
    /// Step index (0-based).
    pub index: usize,
    /// Calendar month of the step.
    pub month: ModelMonth,
    /// Aggregators of all active components, in check order.
    pub aggregators: &'a [SeriesAggregator],
}

/// Receives progress from the driver.
pub trait StepObserver {
    /// Called once when the first step with data is found.
    fn on_first(&mut self, _month: ModelMonth) -> io::Result<()> {
        Ok(())
    }

    /// Called after every step whose 1-based count is a multiple of the
    /// print interval.
    fn on_step(&mut self, report: &StepReport<'_>) -> io::Result<()>;
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl StepObserver for SilentObserver {
    fn on_step(&mut self, _report: &StepReport<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Configuration for a [`TimestepDriver`].
///
/// # Example
///
/// ```
/// use drift_aggregate::DriverConfig;
/// use drift_calendar::ModelMonth;
///
/// let config = DriverConfig::new(ModelMonth::first_of_year(1).unwrap())
///     .with_max_steps(240)
///     .with_print_interval(12);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seek_months(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    start: ModelMonth,
    max_steps: usize,
    print_interval: usize,
    seek_months: usize,
}

impl DriverConfig {
    /// Creates a configuration starting at `start`.
    ///
    /// Defaults: `max_steps = 6000`, `print_interval = 10`, `seek_months = 0`.
    pub fn new(start: ModelMonth) -> Self {
        Self {
            start,
            max_steps: 6000,
            print_interval: 10,
            seek_months: 0,
        }
    }

    /// Sets the maximum number of steps to ingest.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets how often (in steps) the observer is notified.
    pub fn with_print_interval(mut self, print_interval: usize) -> Self {
        self.print_interval = print_interval;
        self
    }

    /// Sets how many months past `start` may be searched for the first step.
    pub fn with_seek_months(mut self, seek_months: usize) -> Self {
        self.seek_months = seek_months;
        self
    }

    /// First calendar month searched.
    pub fn start(&self) -> ModelMonth {
        self.start
    }

    /// Step budget.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Observer interval in steps.
    pub fn print_interval(&self) -> usize {
        self.print_interval
    }

    /// Extra months searched while seeking the first step.
    pub fn seek_months(&self) -> usize {
        self.seek_months
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.print_interval == 0 {
            return Err(AggregateError::InvalidPrintInterval {
                interval: self.print_interval,
            });
        }
        Ok(())
    }
}

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The step budget was used up.
    StepBudget,
    /// A component had no file for the next month.
    MissingData {
        /// First component found without data.
        component: Component,
        /// The month lacking data.
        month: ModelMonth,
    },
    /// No month within the seek range had data for every component.
    NoData,
    /// The last processed month was December of the last addressable year.
    CalendarEnd,
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Probing months for the first one with data.
    SeekingFirst,
    /// Ingesting consecutive months.
    Streaming,
    /// Finished; series are final.
    Ended,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// First processed month.
    pub first: Option<ModelMonth>,
    /// Last processed month.
    pub last: Option<ModelMonth>,
    /// Number of processed steps.
    pub steps: usize,
    /// Stop condition.
    pub stop: StopReason,
}

impl RunSummary {
    /// `(first, last)` labels, if any step was processed.
    pub fn label_range(&self) -> Option<(String, String)> {
        Some((self.first?.label(), self.last?.label()))
    }
}

/// Streams calendar months from a [`StepSource`] into per-component
/// aggregators.
///
/// A month is ingested only if every active component has data for it;
/// components are checked in [`Component::ALL`] order.
pub struct TimestepDriver<S> {
    source: S,
    config: DriverConfig,
    aggregators: Vec<SeriesAggregator>,
    state: DriverState,
    seek_offset: usize,
    cursor: ModelMonth,
    first: Option<ModelMonth>,
    last: Option<ModelMonth>,
    stop: Option<StopReason>,
}

impl<S: StepSource> TimestepDriver<S> {
    /// Creates a driver for every component of `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` or `windows` fail validation.
    pub fn new(
        source: S,
        registry: &VariableRegistry,
        windows: WindowConfig,
        config: DriverConfig,
    ) -> Result<Self, AggregateError> {
        config.validate()?;
        windows.validate()?;
        let aggregators = registry
            .entries()
            .iter()
            .map(|e| SeriesAggregator::new(e.set().clone(), windows))
            .collect();
        Ok(Self {
            source,
            config,
            aggregators,
            state: DriverState::SeekingFirst,
            seek_offset: 0,
            cursor: config.start(),
            first: None,
            last: None,
            stop: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Aggregators in check order.
    pub fn aggregators(&self) -> &[SeriesAggregator] {
        &self.aggregators
    }

    /// Aggregator of `component`, if active.
    pub fn aggregator(&self, component: Component) -> Option<&SeriesAggregator> {
        self.aggregators.iter().find(|a| a.component() == component)
    }

    /// The step source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of processed steps.
    pub fn steps(&self) -> usize {
        self.aggregators.first().map_or(0, SeriesAggregator::len)
    }

    /// Summary of the run, once ended.
    pub fn summary(&self) -> Option<RunSummary> {
        let stop = self.stop?;
        Some(RunSummary {
            first: self.first,
            last: self.last,
            steps: self.steps(),
            stop,
        })
    }

    /// Performs one state transition and returns the new state.
    pub fn step(&mut self, observer: &mut dyn StepObserver) -> Result<DriverState, DriverError> {
        match self.state {
            DriverState::SeekingFirst => self.seek(observer)?,
            DriverState::Streaming => self.advance(observer)?,
            DriverState::Ended => {}
        }
        Ok(self.state)
    }

    /// Runs until [`DriverState::Ended`].
    pub fn run(&mut self, observer: &mut dyn StepObserver) -> Result<RunSummary, DriverError> {
        while self.step(observer)? != DriverState::Ended {}
        let summary = RunSummary {
            first: self.first,
            last: self.last,
            steps: self.steps(),
            stop: self.stop.unwrap_or(StopReason::NoData),
        };
        info!(
            steps = summary.steps,
            stop = ?summary.stop,
            "run ended"
        );
        Ok(summary)
    }

    fn seek(&mut self, observer: &mut dyn StepObserver) -> Result<(), DriverError> {
        if self.config.max_steps() == 0 {
            self.finish(StopReason::StepBudget);
            return Ok(());
        }
        let Some(month) = self.config.start().checked_advance(self.seek_offset) else {
            self.finish(StopReason::NoData);
            return Ok(());
        };
        match self.missing_component(month) {
            None => {
                info!(month = %month, "first data found");
                self.first = Some(month);
                self.cursor = month;
                self.state = DriverState::Streaming;
                observer.on_first(month)?;
            }
            Some(component) => {
                debug!(month = %month, component = %component, "no data while seeking");
                self.seek_offset += 1;
                if self.seek_offset > self.config.seek_months() {
                    self.finish(StopReason::NoData);
                }
            }
        }
        Ok(())
    }

    fn advance(&mut self, observer: &mut dyn StepObserver) -> Result<(), DriverError> {
        let index = self.steps();
        if index >= self.config.max_steps() {
            self.finish(StopReason::StepBudget);
            return Ok(());
        }
        let month = self.cursor;
        if let Some(component) = self.missing_component(month) {
            self.finish(StopReason::MissingData { component, month });
            return Ok(());
        }

        let means = (0..self.aggregators.len())
            .map(|k| self.read_means(k, month))
            .collect::<Result<Vec<_>, _>>()?;
        for (agg, means) in self.aggregators.iter_mut().zip(&means) {
            agg.ingest(index, means)?;
        }
        trace!(index, month = %month, "step ingested");
        self.last = Some(month);
        match month.checked_next() {
            Some(next) => self.cursor = next,
            None => self.finish(StopReason::CalendarEnd),
        }

        if (index + 1) % self.config.print_interval() == 0 {
            observer.on_step(&StepReport {
                index,
                month,
                aggregators: &self.aggregators,
            })?;
        }
        Ok(())
    }

    /// Spatial means of the raw variables of aggregator `k` at `month`.
    fn read_means(&self, k: usize, month: ModelMonth) -> Result<Vec<f64>, DriverError> {
        let agg = &self.aggregators[k];
        let component = agg.component();
        let names: Vec<&str> = agg.variable_set().raw_names().collect();
        let step = self
            .source
            .read_step(component, month, &names)
            .map_err(|source| DriverError::Source {
                component,
                month,
                source,
            })?;
        if step.fields.len() != names.len() {
            return Err(AggregateError::WidthMismatch {
                component,
                expected: names.len(),
                actual: step.fields.len(),
            }
            .into());
        }
        for (name, field) in names.iter().zip(&step.fields) {
            if field.is_none() {
                debug!(component = %component, month = %month, variable = *name, "variable absent; using NaN");
            }
        }
        let means = step
            .fields
            .par_iter()
            .map(|field| match field {
                Some(values) => area_weighted_mean(&step.lon, &step.lat, values),
                None => Ok(f64::NAN),
            })
            .collect::<Result<Vec<f64>, AggregateError>>()?;
        Ok(means)
    }

    fn missing_component(&self, month: ModelMonth) -> Option<Component> {
        self.aggregators
            .iter()
            .map(SeriesAggregator::component)
            .find(|&c| !self.source.has_step(c, month))
    }

    fn finish(&mut self, stop: StopReason) {
        match stop {
            StopReason::MissingData { component, month } => {
                info!(component = %component, month = %month, "end of available data");
            }
            StopReason::StepBudget => info!(steps = self.steps(), "step budget reached"),
            StopReason::NoData => info!(start = %self.config.start(), "no data found"),
            StopReason::CalendarEnd => info!(last = ?self.last, "calendar end reached"),
        }
        self.stop = Some(stop);
        self.state = DriverState::Ended;
    }
}
