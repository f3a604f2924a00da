//! Low-level NetCDF extraction helpers.

use std::path::Path;

use netcdf::{AttributeValue, Extent, Extents};

use crate::error::IoError;

/// Grid sizes of a history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridInfo {
    /// Number of longitudes.
    pub nlon: usize,
    /// Number of latitudes.
    pub nlat: usize,
    /// Number of vertical levels, if the file has a `lev` axis.
    pub nlev: Option<usize>,
}

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read the first horizontal slice of `name` as a row-major `[nlat, nlon]`
/// field.
///
/// The variable's two trailing dimensions must be `(nlat, nlon)`; any
/// leading axes (time, level) are indexed at zero. Cells equal to the
/// `_FillValue` or `missing_value` attribute become NaN. Returns `Ok(None)`
/// if the file has no such variable.
pub(crate) fn read_surface_field(
    file: &netcdf::File,
    name: &str,
    nlat: usize,
    nlon: usize,
) -> Result<Option<Vec<f64>>, IoError> {
    let Some(var) = file.variable(name) else {
        return Ok(None);
    };

    let dims = var.dimensions();
    if dims.len() < 2 {
        return Err(IoError::DimensionMismatch {
            name: format!("{name} dimensions"),
            expected: 2,
            got: dims.len(),
        });
    }
    let ny = dims[dims.len() - 2].len();
    let nx = dims[dims.len() - 1].len();
    if ny != nlat {
        return Err(IoError::DimensionMismatch {
            name: format!("{name} lat"),
            expected: nlat,
            got: ny,
        });
    }
    if nx != nlon {
        return Err(IoError::DimensionMismatch {
            name: format!("{name} lon"),
            expected: nlon,
            got: nx,
        });
    }

    // First index of every leading dimension (time, level) and the full
    // horizontal slab.
    let mut extents: Vec<Extent> = (2..dims.len()).map(|_| Extent::from(0..1)).collect();
    extents.push(Extent::from(0..nlat));
    extents.push(Extent::from(0..nlon));
    let mut data = var.get_values::<f64, _>(Extents::from(extents))?;

    if let Some(fill) = fill_value(&var) {
        for v in &mut data {
            if *v == fill {
                *v = f64::NAN;
            }
        }
    }
    Ok(Some(data))
}

fn fill_value(var: &netcdf::Variable<'_>) -> Option<f64> {
    ["_FillValue", "missing_value"].into_iter().find_map(|attr| {
        match var.attribute_value(attr).and_then(Result::ok)? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(f64::from(v)),
            _ => None,
        }
    })
}

/// Reads the grid sizes of the file at `path`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::MissingVariable`] if the
/// file or a horizontal coordinate is absent.
pub fn peek_grid(path: &Path, lon_aliases: &[&str], lat_aliases: &[&str]) -> Result<GridInfo, IoError> {
    let file = open_file(path)?;
    let nlon = read_1d_f64(&file, lon_aliases, path)?.len();
    let nlat = read_1d_f64(&file, lat_aliases, path)?.len();
    let nlev = file.dimension("lev").map(|d| d.len());
    Ok(GridInfo { nlon, nlat, nlev })
}
