//! Area-weighted global mean on a rectilinear latitude/longitude grid.

use crate::error::AggregateError;

/// Area-weighted mean of a row-major `[nlat, nlon]` field.
///
/// A field holding several such slices (a leading time axis) is averaged over
/// its first slice only. Cell weight is the latitude band area
/// `sin(north) - sin(south)` times the longitude width, with band edges at
/// midpoints between cell centres. Non-finite cells are skipped; if every
/// cell is skipped the result is NaN.
///
/// # Errors
///
/// Returns [`AggregateError::FieldShape`] if an axis is empty or the field
/// length is not a non-zero multiple of `nlat * nlon`.
pub fn area_weighted_mean(lon: &[f64], lat: &[f64], field: &[f64]) -> Result<f64, AggregateError> {
    let (nlat, nlon) = (lat.len(), lon.len());
    let cells = nlat * nlon;
    if cells == 0 || field.is_empty() || field.len() % cells != 0 {
        return Err(AggregateError::FieldShape {
            nlat,
            nlon,
            actual: field.len(),
        });
    }

    let lat_weights = latitude_weights(lat);
    let lon_widths = longitude_widths(lon);

    let mut sum = 0.0;
    let mut weight = 0.0;
    for (row, &wy) in field[..cells].chunks_exact(nlon).zip(&lat_weights) {
        for (&value, &wx) in row.iter().zip(&lon_widths) {
            if value.is_finite() {
                let w = wy * wx;
                sum += w * value;
                weight += w;
            }
        }
    }
    if weight > 0.0 {
        Ok(sum / weight)
    } else {
        Ok(f64::NAN)
    }
}

/// Band areas `|sin(north) - sin(south)|` per latitude centre.
fn latitude_weights(lat: &[f64]) -> Vec<f64> {
    let edges = cell_edges(lat, 90.0);
    edges
        .windows(2)
        .map(|e| {
            let a = e[0].clamp(-90.0, 90.0).to_radians().sin();
            let b = e[1].clamp(-90.0, 90.0).to_radians().sin();
            (b - a).abs()
        })
        .collect()
}

/// Cell widths in degrees per longitude centre.
fn longitude_widths(lon: &[f64]) -> Vec<f64> {
    let edges = cell_edges(lon, 180.0);
    edges.windows(2).map(|e| (e[1] - e[0]).abs()).collect()
}

/// Edges between centres, with the outer edges mirrored from the first and
/// last spacing. A single centre spans `[c - half_span, c + half_span]`.
fn cell_edges(centres: &[f64], half_span: f64) -> Vec<f64> {
    let n = centres.len();
    if n == 1 {
        return vec![centres[0] - half_span, centres[0] + half_span];
    }
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centres[0] - (centres[1] - centres[0]) / 2.0);
    for pair in centres.windows(2) {
        edges.push((pair[0] + pair[1]) / 2.0);
    }
    edges.push(centres[n - 1] + (centres[n - 1] - centres[n - 2]) / 2.0);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn grid(nlat: usize, nlon: usize) -> (Vec<f64>, Vec<f64>) {
        let dlat = 180.0 / nlat as f64;
        let dlon = 360.0 / nlon as f64;
        let lat = (0..nlat).map(|j| -90.0 + dlat * (j as f64 + 0.5)).collect();
        let lon = (0..nlon).map(|i| dlon * i as f64).collect();
        (lon, lat)
    }

    #[test]
    fn constant_field() {
        let (lon, lat) = grid(6, 8);
        let field = vec![273.15; 48];
        assert_relative_eq!(
            area_weighted_mean(&lon, &lat, &field).unwrap(),
            273.15,
            epsilon = 1e-9
        );
    }

    #[test]
    fn hemispheres_weigh_equally() {
        let (lon, lat) = grid(4, 3);
        let mut field = vec![0.0; 12];
        for v in &mut field[6..] {
            *v = 1.0;
        }
        assert_abs_diff_eq!(
            area_weighted_mean(&lon, &lat, &field).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn polar_rows_weigh_less() {
        let (lon, lat) = grid(3, 1);
        // Equatorial band [-30, 30] has weight 1.0, each polar band 0.5.
        let field = [0.0, 1.0, 0.0];
        assert_relative_eq!(
            area_weighted_mean(&lon, &lat, &field).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn descending_latitudes() {
        let (lon, mut lat) = grid(3, 1);
        lat.reverse();
        let field = [0.0, 1.0, 0.0];
        assert_relative_eq!(
            area_weighted_mean(&lon, &lat, &field).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn nan_cells_skipped() {
        let (lon, lat) = grid(2, 2);
        let field = [1.0, f64::NAN, 1.0, 1.0];
        assert_relative_eq!(area_weighted_mean(&lon, &lat, &field).unwrap(), 1.0);
    }

    #[test]
    fn all_nan_gives_nan() {
        let (lon, lat) = grid(2, 2);
        let field = [f64::NAN; 4];
        assert!(area_weighted_mean(&lon, &lat, &field).unwrap().is_nan());
    }

    #[test]
    fn leading_time_axis_uses_first_slice() {
        let (lon, lat) = grid(2, 2);
        let field = [2.0, 2.0, 2.0, 2.0, 9.0, 9.0, 9.0, 9.0];
        assert_relative_eq!(area_weighted_mean(&lon, &lat, &field).unwrap(), 2.0);
    }

    #[test]
    fn shape_mismatch() {
        let (lon, lat) = grid(2, 3);
        let err = area_weighted_mean(&lon, &lat, &[1.0; 7]).unwrap_err();
        assert_eq!(
            err,
            AggregateError::FieldShape {
                nlat: 2,
                nlon: 3,
                actual: 7
            }
        );
        assert!(area_weighted_mean(&[], &lat, &[]).is_err());
    }

    #[test]
    fn edges_mirror_outer_spacing() {
        assert_eq!(cell_edges(&[0.0, 10.0, 30.0], 180.0), vec![-5.0, 5.0, 20.0, 40.0]);
        assert_eq!(cell_edges(&[45.0], 90.0), vec![-45.0, 135.0]);
    }
}
