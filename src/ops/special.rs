// src/ops/special.rs

//! # 특수 함수
//!
//! Binomial coefficients, the Gauss hypergeometric function and orthonormal
//! spherical harmonics, in the conventions the Zernike factors need.

use num_complex::Complex64;
use num_traits::Zero;
use std::f64::consts::PI;

/// Largest `n` for which `binomial` is evaluated exactly in `u128`.
/// `C(120, 60)` is about `9.7e34`, well below `u128::MAX`.
const EXACT_BINOMIAL_LIMIT: u64 = 120;

const HYP2F1_MAX_TERMS: usize = 10_000;
const HYP2F1_TOL: f64 = 1e-16;

/// Binomial coefficient `C(n, k)` as `f64`; `0` when `k > n`.
pub fn binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    if n <= EXACT_BINOMIAL_LIMIT {
        return num_integer::binomial(n as u128, k as u128) as f64;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Returns `Some(k)` if `x` is the non-positive integer `-k`.
fn non_positive_integer(x: f64) -> Option<u64> {
    if x <= 0.0 && x.fract() == 0.0 {
        Some((-x) as u64)
    } else {
        None
    }
}

/// Gauss hypergeometric function `₂F₁(a, b; c; x)` by direct series.
///
/// A non-positive integer `a` or `b` makes the series a polynomial, which is
/// evaluated exactly term by term for any `x`. Otherwise the series is only
/// summed for `|x| < 1`; outside that, or when it fails to converge, the
/// result is `NaN` so callers can detect it.
///
/// # Arguments
/// * `a`, `b` - numerator parameters
/// * `c` - denominator parameter, must not be a non-positive integer
/// * `x` - argument
pub fn hyp2f1(a: f64, b: f64, c: f64, x: f64) -> f64 {
    let terminating = match (non_positive_integer(a), non_positive_integer(b)) {
        (Some(ka), Some(kb)) => Some(ka.min(kb)),
        (Some(k), None) | (None, Some(k)) => Some(k),
        (None, None) => None,
    };

    if let Some(c_pole) = non_positive_integer(c) {
        // Pole in (c)_j unless the series stops before reaching it.
        if terminating.map_or(true, |k| k >= c_pole) {
            return f64::NAN;
        }
    }

    if let Some(k) = terminating {
        let mut term = 1.0;
        let mut sum = 1.0;
        for j in 0..k {
            let j = j as f64;
            term *= (a + j) * (b + j) / ((c + j) * (j + 1.0)) * x;
            sum += term;
        }
        return sum;
    }

    if !(x.abs() < 1.0) {
        return f64::NAN;
    }

    let mut term = 1.0;
    let mut sum = 1.0;
    for j in 0..HYP2F1_MAX_TERMS {
        let j = j as f64;
        term *= (a + j) * (b + j) / ((c + j) * (j + 1.0)) * x;
        sum += term;
        if term.abs() <= HYP2F1_TOL * sum.abs() {
            return sum;
        }
    }
    f64::NAN
}

/// Orthonormal associated Legendre function for `m >= 0`:
///
/// `sqrt((2l+1)/(4π) · (l-m)!/(l+m)!) · P_l^m(cos θ)`
///
/// with the Condon–Shortley phase included in `P_l^m`. Computed by the
/// stable three-term recurrence in `l`; `0` when `m > l`.
pub fn legendre_normalized(l: u32, m: u32, cos_t: f64, sin_t: f64) -> f64 {
    if m > l {
        return 0.0;
    }

    // Diagonal term P̄_m^m
    let mut pmm = (1.0 / (4.0 * PI)).sqrt();
    for k in 1..=m {
        let k = k as f64;
        pmm *= -((2.0 * k + 1.0) / (2.0 * k)).sqrt() * sin_t;
    }
    if l == m {
        return pmm;
    }

    let mf = m as f64;
    let mut p_prev = pmm;
    let mut p = cos_t * (2.0 * mf + 3.0).sqrt() * pmm;
    for ll in (m + 2)..=l {
        let lf = ll as f64;
        let a = ((4.0 * lf * lf - 1.0) / (lf * lf - mf * mf)).sqrt();
        let b = (((lf - 1.0).powi(2) - mf * mf) / (4.0 * (lf - 1.0).powi(2) - 1.0)).sqrt();
        let next = a * (cos_t * p - b * p_prev);
        p_prev = p;
        p = next;
    }
    p
}

/// Spherical harmonic `Y_l^m(θ, φ)` in the physics convention.
///
/// Orthonormal on the unit sphere with the Condon–Shortley phase, so
/// `Y_l^{-m} = (-1)^m conj(Y_l^m)`. Argument order follows the usual
/// `(m, l, azimuth, polar)` layout. Returns `0` when `|m| > l`.
pub fn sph_harm(m: i32, l: u32, azimuth: f64, polar: f64) -> Complex64 {
    let m_abs = m.unsigned_abs();
    if m_abs > l {
        return Complex64::zero();
    }

    let p = legendre_normalized(l, m_abs, polar.cos(), polar.sin());
    let y = Complex64::from_polar(p, m_abs as f64 * azimuth);
    if m >= 0 {
        y
    } else if m_abs % 2 == 0 {
        y.conj()
    } else {
        -y.conj()
    }
}
