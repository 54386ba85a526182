use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::ops::coords;

/// `(N, 3)` Cartesian coordinates to `(N, 3)` columns `r, t, p`.
#[pyfunction]
pub fn cartesian_to_spherical<'py>(py: Python<'py>, xyz: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray2<f64>> {
    let xyz = xyz.as_array();
    let result = py.allow_threads(|| coords::cartesian_to_spherical(&xyz))?;
    Ok(result.into_pyarray(py))
}

#[pyfunction]
pub fn spherical_to_cartesian<'py>(py: Python<'py>, rtp: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray2<f64>> {
    let rtp = rtp.as_array();
    let result = py.allow_threads(|| coords::spherical_to_cartesian(&rtp))?;
    Ok(result.into_pyarray(py))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cartesian_to_spherical, m)?)?;
    m.add_function(wrap_pyfunction!(spherical_to_cartesian, m)?)?;
    Ok(())
}
