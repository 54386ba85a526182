// src/bindings/zernike.rs

//! # Zernike 투영을 위한 Python 바인딩
//!
//! numpy arrays in, complex numpy arrays out. The GIL is released while the
//! coefficients are computed.

use numpy::{Complex64, IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;

use crate::config::{ProjectionConfig, SupportPolicy};
use crate::error::ZernikeError;
use crate::index::IndexSupport;
use crate::neighborhood::Neighborhood;
use crate::ops::zernike;
use crate::projection::{project_batch, ProjectionPlan};

impl From<ZernikeError> for PyErr {
    fn from(err: ZernikeError) -> PyErr {
        let message = err.to_string();
        let root = match &err {
            ZernikeError::Neighborhood { source, .. } => source.as_ref(),
            other => other,
        };
        match root {
            ZernikeError::OutOfSupport { .. } | ZernikeError::NonFinite { .. } => {
                PyArithmeticError::new_err(message)
            }
            _ => PyValueError::new_err(message),
        }
    }
}

fn config_from(r_max: f64, policy: &str) -> PyResult<ProjectionConfig> {
    let policy: SupportPolicy = policy.parse()?;
    Ok(ProjectionConfig::new(r_max)?.with_policy(policy))
}

fn neighborhood<'a>(
    r: &'a PyReadonlyArray1<f64>,
    t: &'a PyReadonlyArray1<f64>,
    p: &'a PyReadonlyArray1<f64>,
    weights: Option<&'a PyReadonlyArray1<f64>>,
) -> Result<Neighborhood<'a>, ZernikeError> {
    let nb = Neighborhood::new(r.as_array(), t.as_array(), p.as_array())?;
    match weights {
        Some(w) => nb.with_weights(w.as_array()),
        None => Ok(nb),
    }
}

#[pyfunction]
#[pyo3(signature = (r, t, p, n, r_max, l, m, weights=None, policy="exclude"))]
pub fn zernike_coeff_lm(
    py: Python,
    r: PyReadonlyArray1<f64>,
    t: PyReadonlyArray1<f64>,
    p: PyReadonlyArray1<f64>,
    n: u32,
    r_max: f64,
    l: u32,
    m: i32,
    weights: Option<PyReadonlyArray1<f64>>,
    policy: &str,
) -> PyResult<Complex64> {
    let config = config_from(r_max, policy)?;
    let nb = neighborhood(&r, &t, &p, weights.as_ref())?;
    Ok(py.allow_threads(|| zernike::zernike_coeff_lm(&nb, n, l, m, &config))?)
}

#[pyfunction]
#[pyo3(signature = (r, t, p, n, r_max, l, weights=None, policy="exclude"))]
pub fn zernike_coeff_l<'py>(
    py: Python<'py>,
    r: PyReadonlyArray1<f64>,
    t: PyReadonlyArray1<f64>,
    p: PyReadonlyArray1<f64>,
    n: u32,
    r_max: f64,
    l: u32,
    weights: Option<PyReadonlyArray1<f64>>,
    policy: &str,
) -> PyResult<&'py PyArray1<Complex64>> {
    let config = config_from(r_max, policy)?;
    let nb = neighborhood(&r, &t, &p, weights.as_ref())?;
    let result = py.allow_threads(|| zernike::zernike_coeff_l(&nb, n, l, &config))?;
    Ok(result.into_pyarray(py))
}

/// One neighborhood against parallel `n`, `l`, `m` index arrays.
#[pyfunction]
#[pyo3(signature = (r, t, p, n, l, m, r_max, weights=None, policy="exclude"))]
pub fn zernike_coeffs<'py>(
    py: Python<'py>,
    r: PyReadonlyArray1<f64>,
    t: PyReadonlyArray1<f64>,
    p: PyReadonlyArray1<f64>,
    n: Vec<u32>,
    l: Vec<u32>,
    m: Vec<i32>,
    r_max: f64,
    weights: Option<PyReadonlyArray1<f64>>,
    policy: &str,
) -> PyResult<&'py PyArray1<Complex64>> {
    let config = config_from(r_max, policy)?;
    let plan = ProjectionPlan::new(IndexSupport::from_arrays(&n, &l, &m)?)?;
    let nb = neighborhood(&r, &t, &p, weights.as_ref())?;
    let projection = py.allow_threads(|| plan.project(&nb, &config))?;
    Ok(projection.coefficients.into_pyarray(py))
}

/// A list of neighborhoods against one index support; returns a
/// `(neighborhoods, terms)` complex array.
#[pyfunction]
#[pyo3(signature = (r, t, p, n, l, m, r_max, weights=None, policy="exclude"))]
pub fn zernike_coeffs_batch<'py>(
    py: Python<'py>,
    r: Vec<PyReadonlyArray1<f64>>,
    t: Vec<PyReadonlyArray1<f64>>,
    p: Vec<PyReadonlyArray1<f64>>,
    n: Vec<u32>,
    l: Vec<u32>,
    m: Vec<i32>,
    r_max: f64,
    weights: Option<Vec<PyReadonlyArray1<f64>>>,
    policy: &str,
) -> PyResult<&'py PyArray2<Complex64>> {
    let config = config_from(r_max, policy)?;
    let plan = ProjectionPlan::new(IndexSupport::from_arrays(&n, &l, &m)?)?;

    for (what, found) in [("polar angle arrays", t.len()), ("azimuth arrays", p.len())]
        .into_iter()
        .chain(weights.as_ref().map(|w| ("weight arrays", w.len())))
    {
        if found != r.len() {
            return Err(ZernikeError::ShapeMismatch {
                what,
                expected: r.len(),
                found,
            }
            .into());
        }
    }

    let neighborhoods = (0..r.len())
        .map(|i| {
            neighborhood(&r[i], &t[i], &p[i], weights.as_ref().map(|w| &w[i]))
                .map_err(|e| e.in_neighborhood(i))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let batch = py.allow_threads(|| project_batch(&neighborhoods, &plan, &config))?;
    Ok(batch.coefficients.into_pyarray(py))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(zernike_coeff_lm, m)?)?;
    m.add_function(wrap_pyfunction!(zernike_coeff_l, m)?)?;
    m.add_function(wrap_pyfunction!(zernike_coeffs, m)?)?;
    m.add_function(wrap_pyfunction!(zernike_coeffs_batch, m)?)?;
    Ok(())
}
