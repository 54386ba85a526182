use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;
use std::f64::consts::TAU;

use crate::error::{Result, ZernikeError};

fn check_three_columns(x: &ArrayView2<f64>) -> Result<()> {
    if x.ncols() != 3 {
        return Err(ZernikeError::ShapeMismatch {
            what: "coordinate columns",
            expected: 3,
            found: x.ncols(),
        });
    }
    Ok(())
}

/// Converts `(N, 3)` Cartesian coordinates, already centred on the
/// neighborhood's reference atom, to `(N, 3)` rows of `(r, θ, φ)`.
///
/// θ is the polar angle in `[0, π]`, φ the azimuth in `[0, 2π)`. The origin
/// maps to `(0, 0, 0)`.
pub fn cartesian_to_spherical(xyz: &ArrayView2<f64>) -> Result<Array2<f64>> {
    check_three_columns(xyz)?;
    let mut result = Array2::zeros((xyz.nrows(), 3));

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let (x, y, z) = (xyz[[i, 0]], xyz[[i, 1]], xyz[[i, 2]]);
            let r = (x * x + y * y + z * z).sqrt();
            if r == 0.0 {
                return;
            }
            let theta = (z / r).clamp(-1.0, 1.0).acos();
            let mut phi = y.atan2(x).rem_euclid(TAU);
            if phi >= TAU {
                phi = 0.0;
            }
            row[0] = r;
            row[1] = theta;
            row[2] = phi;
        });

    Ok(result)
}

/// Inverse of [`cartesian_to_spherical`]: `(r, θ, φ)` rows to `(x, y, z)`.
pub fn spherical_to_cartesian(rtp: &ArrayView2<f64>) -> Result<Array2<f64>> {
    check_three_columns(rtp)?;
    let mut result = Array2::zeros((rtp.nrows(), 3));

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let (r, theta, phi) = (rtp[[i, 0]], rtp[[i, 1]], rtp[[i, 2]]);
            row[0] = r * theta.sin() * phi.cos();
            row[1] = r * theta.sin() * phi.sin();
            row[2] = r * theta.cos();
        });

    Ok(result)
}
