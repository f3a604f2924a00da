//! Integration tests for reading history files from an archive tree.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use drift_aggregate::{
    Component, DriverConfig, SilentObserver, StepSource, StopReason, TimestepDriver,
    VariableLists, VariableRegistry, WindowConfig,
};
use drift_calendar::ModelMonth;
use drift_io::{ArchiveLayout, IoError, NetcdfArchive, RunMode, peek_grid, read_variable_lists};
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Helper: programmatic history-file builder
// ---------------------------------------------------------------------------

struct HistoryBuilder {
    lons: Vec<f64>,
    lats: Vec<f64>,
    nlev: Option<usize>,
    /// Surface variables in `[time=1, lat, lon]` order.
    vars: Vec<(String, Vec<f64>, Option<f64>)>,
    /// Level variables in `[time=1, lev, lat, lon]` order.
    profiles: Vec<(String, Vec<f64>)>,
}

impl HistoryBuilder {
    fn new(nlat: usize, nlon: usize) -> Self {
        let dlat = 180.0 / nlat as f64;
        let dlon = 360.0 / nlon as f64;
        Self {
            lons: (0..nlon).map(|i| dlon * i as f64).collect(),
            lats: (0..nlat).map(|j| -90.0 + dlat * (j as f64 + 0.5)).collect(),
            nlev: None,
            vars: Vec::new(),
            profiles: Vec::new(),
        }
    }

    fn with_lev(mut self, nlev: usize) -> Self {
        self.nlev = Some(nlev);
        self
    }

    fn with_const(mut self, name: &str, value: f64) -> Self {
        let n = self.lons.len() * self.lats.len();
        self.vars.push((name.to_string(), vec![value; n], None));
        self
    }

    fn with_values(mut self, name: &str, values: Vec<f64>, fill: Option<f64>) -> Self {
        self.vars.push((name.to_string(), values, fill));
        self
    }

    fn with_profile(mut self, name: &str, values: Vec<f64>) -> Self {
        self.profiles.push((name.to_string(), values));
        self
    }

    fn write(&self, path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = netcdf::create(path).expect("failed to create NetCDF file");

        file.add_dimension("time", 1).expect("add dim time");
        file.add_dimension("lat", self.lats.len()).expect("add dim lat");
        file.add_dimension("lon", self.lons.len()).expect("add dim lon");
        if let Some(nlev) = self.nlev {
            file.add_dimension("lev", nlev).expect("add dim lev");
        }

        {
            let mut var = file
                .add_variable::<f64>("lon", &["lon"])
                .expect("add var lon");
            var.put_values(&self.lons, ..).expect("put lon values");
        }
        {
            let mut var = file
                .add_variable::<f64>("lat", &["lat"])
                .expect("add var lat");
            var.put_values(&self.lats, ..).expect("put lat values");
        }

        for (name, values, fill) in &self.vars {
            let mut var = file
                .add_variable::<f64>(name, &["time", "lat", "lon"])
                .expect("add field var");
            if let Some(fv) = fill {
                var.put_attribute("_FillValue", *fv)
                    .expect("add _FillValue");
            }
            var.put_values(values, ..).expect("put field values");
        }
        for (name, values) in &self.profiles {
            let mut var = file
                .add_variable::<f64>(name, &["time", "lev", "lat", "lon"])
                .expect("add profile var");
            var.put_values(values, ..).expect("put profile values");
        }
    }
}

fn month(k: usize) -> ModelMonth {
    ModelMonth::first_of_year(1).unwrap().advance(k)
}

fn layout(root: &Path) -> ArchiveLayout {
    ArchiveLayout::new(root, "exo")
}

fn write_month(root: &Path, component: Component, k: usize, builder: &HistoryBuilder) -> PathBuf {
    let path = layout(root).history_file(component, month(k));
    builder.write(&path);
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn has_step_follows_files() {
    let dir = tempdir().unwrap();
    write_month(
        dir.path(),
        Component::Atmosphere,
        0,
        &HistoryBuilder::new(2, 4).with_const("TS", 288.0),
    );
    let archive = NetcdfArchive::new(layout(dir.path()));
    assert!(archive.has_step(Component::Atmosphere, month(0)));
    assert!(!archive.has_step(Component::Atmosphere, month(1)));
    assert!(!archive.has_step(Component::Land, month(0)));
}

#[test]
fn read_fields_maps_fill_and_absent_variables() {
    let dir = tempdir().unwrap();
    let fill = 1.0e36;
    let builder = HistoryBuilder::new(2, 2)
        .with_const("TS", 250.0)
        .with_values("PS", vec![1.0, fill, 3.0, 4.0], Some(fill));
    write_month(dir.path(), Component::Atmosphere, 0, &builder);

    let archive = NetcdfArchive::new(layout(dir.path()));
    let step = archive
        .read_fields(Component::Atmosphere, month(0), &["TS", "PS", "PRECT"])
        .unwrap();
    assert_eq!(step.lon.len(), 2);
    assert_eq!(step.lat.len(), 2);
    assert_eq!(step.fields.len(), 3);
    assert_eq!(step.fields[0].as_deref(), Some(&[250.0; 4][..]));
    let ps = step.fields[1].as_ref().unwrap();
    assert!(ps[1].is_nan());
    assert_relative_eq!(ps[3], 4.0);
    assert!(step.fields[2].is_none());
}

#[test]
fn level_variable_reads_first_slice_only() {
    let dir = tempdir().unwrap();
    let values: Vec<f64> = (0..3).flat_map(|k| [10.0 * (k + 1) as f64; 4]).collect();
    let builder = HistoryBuilder::new(2, 2)
        .with_lev(3)
        .with_profile("T", values);
    write_month(dir.path(), Component::Atmosphere, 0, &builder);

    let archive = NetcdfArchive::new(layout(dir.path()));
    let step = archive
        .read_fields(Component::Atmosphere, month(0), &["T"])
        .unwrap();
    assert_eq!(step.fields[0].as_deref(), Some(&[10.0; 4][..]));
}

#[test]
fn missing_file_is_an_error_when_read() {
    let dir = tempdir().unwrap();
    let archive = NetcdfArchive::new(layout(dir.path()));
    let err = archive
        .read_fields(Component::Ice, month(0), &["hi"])
        .unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn custom_coordinate_aliases() {
    let dir = tempdir().unwrap();
    write_month(
        dir.path(),
        Component::Land,
        0,
        &HistoryBuilder::new(2, 2).with_const("TSA", 280.0),
    );
    let archive = NetcdfArchive::new(layout(dir.path())).with_lon_aliases(vec!["x".into()]);
    let err = archive
        .read_fields(Component::Land, month(0), &["TSA"])
        .unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "x"));
}

#[test]
fn peek_grid_reports_levels() {
    let dir = tempdir().unwrap();
    let path = write_month(
        dir.path(),
        Component::Atmosphere,
        0,
        &HistoryBuilder::new(3, 6).with_lev(26).with_const("TS", 1.0),
    );
    let grid = peek_grid(&path, &["lon"], &["lat"]).unwrap();
    assert_eq!(grid.nlon, 6);
    assert_eq!(grid.nlat, 3);
    assert_eq!(grid.nlev, Some(26));
}

#[test]
fn driver_streams_until_first_gap() {
    let dir = tempdir().unwrap();
    for k in 0..14 {
        let b = HistoryBuilder::new(2, 4).with_const("TS", 280.0 + k as f64);
        write_month(dir.path(), Component::Atmosphere, k, &b);
    }
    // A later file after the gap is never reached.
    write_month(
        dir.path(),
        Component::Atmosphere,
        20,
        &HistoryBuilder::new(2, 4).with_const("TS", 0.0),
    );

    let mut lists = std::collections::BTreeMap::new();
    lists.insert(
        Component::Atmosphere,
        VariableLists {
            read: vec!["TS".to_string()],
            print: vec!["TS".to_string()],
            plot: Vec::new(),
        },
    );
    let registry = VariableRegistry::build(&[Component::Atmosphere], &lists).unwrap();
    let mut driver = TimestepDriver::new(
        NetcdfArchive::new(layout(dir.path())),
        &registry,
        WindowConfig::default(),
        DriverConfig::new(month(0)),
    )
    .unwrap();
    let summary = driver.run(&mut SilentObserver).unwrap();

    assert_eq!(summary.steps, 14);
    assert_eq!(
        summary.stop,
        StopReason::MissingData {
            component: Component::Atmosphere,
            month: month(14),
        }
    );
    assert_eq!(summary.last.unwrap().label(), "0002-02");
    let ts = driver
        .aggregator(Component::Atmosphere)
        .unwrap()
        .series("TS")
        .unwrap();
    assert_relative_eq!(ts.raw()[13], 293.0, epsilon = 1e-9);
    // Index 12 averages the twelve preceding months: 280..=291.
    assert_relative_eq!(ts.short_mean()[12], 285.5, epsilon = 1e-9);
}

#[test]
fn rundir_layout_is_read() {
    let dir = tempdir().unwrap();
    let rundir = layout(dir.path()).with_mode(RunMode::RunDir);
    let path = rundir.history_file(Component::Ice, month(0));
    HistoryBuilder::new(2, 2).with_const("hi", 1.5).write(&path);
    assert!(path.starts_with(dir.path().join("rundir/exo/run")));

    let archive = NetcdfArchive::new(rundir);
    assert!(archive.has_step(Component::Ice, month(0)));
    let step = archive.read_fields(Component::Ice, month(0), &["hi"]).unwrap();
    assert_eq!(step.fields[0].as_ref().unwrap().len(), 4);
}

#[test]
fn variable_list_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vars.in");
    std::fs::write(&path, "cam read TS\ncam print TS\nclm read TSA\n").unwrap();
    let lists = read_variable_lists(&path).unwrap();
    assert_eq!(lists[&Component::Atmosphere].print, vec!["TS"]);
    assert_eq!(lists[&Component::Land].read, vec!["TSA"]);

    let err = read_variable_lists(&dir.path().join("nope.in")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
