//! [`StepSource`] backed by monthly NetCDF history files.

use drift_aggregate::{Component, SourceError, StepFields, StepSource};
use drift_calendar::ModelMonth;
use tracing::debug;

use crate::error::IoError;
use crate::layout::ArchiveLayout;
use crate::netcdf_read;

/// Reads monthly history files laid out by an [`ArchiveLayout`].
///
/// Use the builder methods (`with_*`) to change the coordinate aliases;
/// [`NetcdfArchive::new`] tries `lon`/`longitude` and `lat`/`latitude`.
#[derive(Debug, Clone)]
pub struct NetcdfArchive {
    layout: ArchiveLayout,
    lon_aliases: Vec<String>,
    lat_aliases: Vec<String>,
}

impl NetcdfArchive {
    /// Archive reader over `layout`.
    pub fn new(layout: ArchiveLayout) -> Self {
        Self {
            layout,
            lon_aliases: vec!["lon".into(), "longitude".into()],
            lat_aliases: vec!["lat".into(), "latitude".into()],
        }
    }

    /// Set the names tried for the longitude coordinate.
    pub fn with_lon_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lon_aliases = aliases;
        self
    }

    /// Set the names tried for the latitude coordinate.
    pub fn with_lat_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lat_aliases = aliases;
        self
    }

    /// The file layout.
    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Longitude aliases in lookup order.
    pub fn lon_aliases(&self) -> Vec<&str> {
        self.lon_aliases.iter().map(String::as_str).collect()
    }

    /// Latitude aliases in lookup order.
    pub fn lat_aliases(&self) -> Vec<&str> {
        self.lat_aliases.iter().map(String::as_str).collect()
    }

    /// Reads coordinates and the first horizontal slice of every `names`
    /// variable from the `component` file for `month`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`] if the file cannot be opened, lacks coordinates,
    /// or holds a variable on a different grid.
    pub fn read_fields(
        &self,
        component: Component,
        month: ModelMonth,
        names: &[&str],
    ) -> Result<StepFields, IoError> {
        let path = self.layout.history_file(component, month);
        debug!(path = %path.display(), n = names.len(), "reading history file");
        let file = netcdf_read::open_file(&path)?;
        let lon = netcdf_read::read_1d_f64(&file, &self.lon_aliases(), &path)?;
        let lat = netcdf_read::read_1d_f64(&file, &self.lat_aliases(), &path)?;
        let fields = names
            .iter()
            .map(|name| netcdf_read::read_surface_field(&file, name, lat.len(), lon.len()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StepFields { lon, lat, fields })
    }
}

impl StepSource for NetcdfArchive {
    fn has_step(&self, component: Component, month: ModelMonth) -> bool {
        self.layout.history_file(component, month).is_file()
    }

    fn read_step(
        &self,
        component: Component,
        month: ModelMonth,
        names: &[&str],
    ) -> Result<StepFields, SourceError> {
        Ok(self.read_fields(component, month, names)?)
    }
}
