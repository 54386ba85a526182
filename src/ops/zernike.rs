// src/ops/zernike.rs

//! # 3D Zernike 계수
//!
//! `Z_nlm(r, θ, φ) = R_nl(r / r_max) · Y_l^m(θ, φ)` with the radial part in
//! its hypergeometric closed form. A coefficient is the weighted sum of
//! `conj(Z_nlm)` over a neighborhood:
//!
//! `c(n, l, m) = A · B · C · Σ_points w · E · F · conj(Y)`
//!
//! | factor | value |
//! |--------|-------|
//! | A | `(-1)^((n-l)/2)` |
//! | B | `sqrt(2n + 3)` |
//! | C | `binomial(⌊(n+l+3)/2⌋ - 1, (n-l)/2)` |
//! | E | `₂F₁(-(n-l)/2, (n+l+3)/2; l + 3/2; ρ²)` |
//! | F | `ρ^l` |
//! | Y | `conj(Y_l^m(θ, φ))` |
//!
//! The functions here are the single-term reference path; the deduplicated
//! batched path in `projection` reuses the same factor functions.

use ndarray::{Array1, ArrayView2};
use num_complex::Complex64;
use num_traits::Zero;

use crate::config::ProjectionConfig;
use crate::error::{Result, ZernikeError};
use crate::index::ZernikeIndex;
use crate::neighborhood::Neighborhood;
use crate::ops::special::{binomial, hyp2f1, sph_harm};

/// Dimension of the Zernike polynomials; the engine is specialised to 3D.
pub const DIMENSION: f64 = 3.0;

/// A: `(-1)^((n-l)/2)`
#[inline]
pub(crate) fn sign_factor(n: u32, l: u32) -> f64 {
    if ((n - l) / 2) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// B: `sqrt(2n + D)`
#[inline]
pub fn norm_factor(n: u32) -> f64 {
    (2.0 * n as f64 + DIMENSION).sqrt()
}

/// C: both arguments in integer arithmetic, `⌊(n+l+3)/2⌋ - 1` over `(n-l)/2`.
#[inline]
pub(crate) fn binomial_factor(n: u32, l: u32) -> f64 {
    let upper = (n as u64 + l as u64 + 3) / 2 - 1;
    binomial(upper, ((n - l) / 2) as u64)
}

/// `A · B · C`, or `0` for a vanishing (odd `n - l`) term.
pub(crate) fn prefactor(n: u32, l: u32) -> f64 {
    if (n - l) % 2 == 1 {
        return 0.0;
    }
    sign_factor(n, l) * norm_factor(n) * binomial_factor(n, l)
}

/// E: the hypergeometric radial factor at `rho = r / r_max`.
#[inline]
pub(crate) fn radial_hyp2f1(n: u32, l: u32, rho: f64) -> f64 {
    let (nf, lf) = (n as f64, l as f64);
    hyp2f1(
        -(nf - lf) / 2.0,
        (nf + lf + DIMENSION) / 2.0,
        lf + DIMENSION / 2.0,
        rho * rho,
    )
}

/// F: `rho^l`
#[inline]
pub fn radial_power(l: u32, rho: f64) -> f64 {
    rho.powi(l as i32)
}

/// Y: conjugated spherical harmonic at polar angle `t`, azimuth `p`.
#[inline]
pub fn angular_factor(l: u32, m: i32, t: f64, p: f64) -> Complex64 {
    sph_harm(m, l, p, t).conj()
}

/// Coefficient of a single `(n, l, m)` term for one neighborhood.
///
/// Odd `n - l` returns exactly zero without inspecting the points. Points
/// outside the support are handled by `config.policy`; any non-finite factor
/// fails the call instead of leaking into the sum.
pub fn zernike_coeff_lm(
    neighborhood: &Neighborhood,
    n: u32,
    l: u32,
    m: i32,
    config: &ProjectionConfig,
) -> Result<Complex64> {
    let (coeff, excluded) = zernike_coeff_lm_counted(neighborhood, n, l, m, config)?;
    if excluded > 0 {
        log::debug!(
            "excluded {} of {} points at or beyond r_max={} for (n={}, l={}, m={})",
            excluded,
            neighborhood.len(),
            config.r_max,
            n,
            l,
            m
        );
    }
    Ok(coeff)
}

/// [`zernike_coeff_lm`] together with the number of points dropped under
/// `SupportPolicy::Exclude`. Vanishing terms report no exclusions.
pub fn zernike_coeff_lm_counted(
    neighborhood: &Neighborhood,
    n: u32,
    l: u32,
    m: i32,
    config: &ProjectionConfig,
) -> Result<(Complex64, usize)> {
    let index = ZernikeIndex::new(n, l, m)?;
    config.validate()?;
    if index.is_vanishing() {
        return Ok((Complex64::zero(), 0));
    }
    let admitted = neighborhood.admit(config)?;

    let key = || index.to_string();
    let mut sum = Complex64::zero();
    for (&i, &rho) in admitted.indices.iter().zip(&admitted.rho) {
        let e = radial_hyp2f1(n, l, rho);
        check_finite(e, "E", key, i)?;
        let f = radial_power(l, rho);
        check_finite(f, "F", key, i)?;
        let y = angular_factor(l, m, neighborhood.t()[i], neighborhood.p()[i]);
        if !(y.re.is_finite() && y.im.is_finite()) {
            return Err(non_finite("Y", key(), Some(i)));
        }
        sum += y * (neighborhood.weight(i) * e * f);
    }

    let coeff = sum * prefactor(n, l);
    if !(coeff.re.is_finite() && coeff.im.is_finite()) {
        return Err(non_finite("coefficient", key(), None));
    }
    Ok((coeff, admitted.excluded))
}

/// All `2l + 1` coefficients of one `(n, l)` shell, ordered `m = -l..=l`.
pub fn zernike_coeff_l(
    neighborhood: &Neighborhood,
    n: u32,
    l: u32,
    config: &ProjectionConfig,
) -> Result<Array1<Complex64>> {
    let l_signed = l as i32;
    (-l_signed..=l_signed)
        .map(|m| zernike_coeff_lm(neighborhood, n, l, m, config))
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

/// Single-term coefficients for a `(channels, points)` layout: one
/// coefficient per row. Rows are independent neighborhoods of equal length.
pub fn zernike_coeff_lm_rows(
    r: &ArrayView2<f64>,
    t: &ArrayView2<f64>,
    p: &ArrayView2<f64>,
    weights: Option<&ArrayView2<f64>>,
    n: u32,
    l: u32,
    m: i32,
    config: &ProjectionConfig,
) -> Result<Array1<Complex64>> {
    for (what, found) in [("polar angle rows", t.nrows()), ("azimuth rows", p.nrows())]
        .into_iter()
        .chain(weights.map(|w| ("weight rows", w.nrows())))
    {
        if found != r.nrows() {
            return Err(ZernikeError::ShapeMismatch {
                what,
                expected: r.nrows(),
                found,
            });
        }
    }

    (0..r.nrows())
        .map(|row| {
            let mut neighborhood = Neighborhood::new(r.row(row), t.row(row), p.row(row))?;
            if let Some(w) = weights {
                neighborhood = neighborhood.with_weights(w.row(row))?;
            }
            zernike_coeff_lm(&neighborhood, n, l, m, config)
                .map_err(|e| e.in_neighborhood(row))
        })
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

pub(crate) fn non_finite(factor: &'static str, key: String, point: Option<usize>) -> ZernikeError {
    ZernikeError::NonFinite { factor, key, point }
}

#[inline]
fn check_finite(value: f64, factor: &'static str, key: impl Fn() -> String, point: usize) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(non_finite(factor, key(), Some(point)))
    }
}
