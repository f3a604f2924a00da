//! History-file locations for a model case.

use std::path::{Path, PathBuf};

use drift_aggregate::Component;
use drift_calendar::ModelMonth;

/// Where a case's monthly history files live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Short-term archive: `<root>/archive/<case>/<comp>/hist`.
    #[default]
    Archive,
    /// Live run directory: `<root>/rundir/<case>/run`.
    RunDir,
}

impl RunMode {
    /// Top-level directory under the root.
    pub fn dir_name(self) -> &'static str {
        match self {
            RunMode::Archive => "archive",
            RunMode::RunDir => "rundir",
        }
    }
}

/// File-name infix between the case id and the `YYYY-MM` date.
pub fn history_infix(component: Component) -> &'static str {
    match component {
        Component::Atmosphere => ".cam.h0.",
        Component::Ice => ".cice.h.",
        Component::Land => ".clm2.h0.",
    }
}

/// Archive sub-directory of a component.
fn archive_subdir(component: Component) -> &'static str {
    match component {
        Component::Atmosphere => "atm",
        Component::Ice => "ice",
        Component::Land => "lnd",
    }
}

/// Path construction for one case.
///
/// # Example
///
/// ```
/// use drift_aggregate::Component;
/// use drift_calendar::ModelMonth;
/// use drift_io::{ArchiveLayout, RunMode};
///
/// let layout = ArchiveLayout::new("/scratch", "b40").with_mode(RunMode::Archive);
/// let path = layout.history_file(Component::Atmosphere, ModelMonth::new(12, 3).unwrap());
/// assert!(path.ends_with("archive/b40/atm/hist/b40.cam.h0.0012-03.nc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
    case_id: String,
    mode: RunMode,
}

impl ArchiveLayout {
    /// Layout for `case_id` under `root`, in archive mode.
    pub fn new(root: impl Into<PathBuf>, case_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            case_id: case_id.into(),
            mode: RunMode::Archive,
        }
    }

    /// Sets the run mode.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Case identifier.
    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    /// Run mode.
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Directory holding the history files of `component`.
    pub fn history_dir(&self, component: Component) -> PathBuf {
        let case_dir = self.root.join(self.mode.dir_name()).join(&self.case_id);
        match self.mode {
            RunMode::Archive => case_dir.join(archive_subdir(component)).join("hist"),
            RunMode::RunDir => case_dir.join("run"),
        }
    }

    /// File name of the `component` history file for `month`.
    pub fn file_name(&self, component: Component, month: ModelMonth) -> String {
        format!(
            "{}{}{}.nc",
            self.case_id,
            history_infix(component),
            month.label()
        )
    }

    /// Full path of the `component` history file for `month`.
    pub fn history_file(&self, component: Component, month: ModelMonth) -> PathBuf {
        self.history_dir(component)
            .join(self.file_name(component, month))
    }
}
