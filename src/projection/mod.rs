// src/projection/mod.rs

//! # 중복 제거 기반 Zernike 투영
//!
//! A [`ProjectionPlan`] deduplicates an index support once: each distinct
//! `(n, l)` gets one row of hypergeometric values, each distinct `l` one row
//! of radial powers and each distinct `(l, m)` one row of conjugated
//! spherical harmonics. Projecting a neighborhood fills those
//! `(unique keys × points)` tables and contracts one row triple per
//! requested term. [`ProjectionPlan::reconstruct`] runs the same tables the
//! other way and evaluates an expansion back at points.
//!
//! The plan is immutable and can be shared across threads; see [`batch`].

pub mod batch;

use ndarray::{Array1, Array2, ArrayView1, Zip};
use num_complex::Complex64;
use num_traits::Zero;

use crate::config::ProjectionConfig;
use crate::error::{Result, ZernikeError};
use crate::index::IndexSupport;
use crate::neighborhood::{AdmittedPoints, Neighborhood};
use crate::ops::dedup::UniqueIndex;
use crate::ops::zernike::{angular_factor, non_finite, prefactor, radial_hyp2f1, radial_power};

pub use self::batch::{project_batch, project_batch_isolated, ProjectionBatch};

/// Table rows used by one non-vanishing term.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Term {
    prefactor: f64,
    nl: usize,
    l: usize,
    lm: usize,
}

struct Tables {
    e: Array2<f64>,
    f: Array2<f64>,
    y: Array2<Complex64>,
}

/// Coefficients of one neighborhood, in index-support order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub coefficients: Array1<Complex64>,
    /// Points dropped under `SupportPolicy::Exclude`.
    pub excluded: usize,
}

#[derive(Debug, Clone)]
pub struct ProjectionPlan {
    support: IndexSupport,
    nl: UniqueIndex<(u32, u32)>,
    l: UniqueIndex<u32>,
    lm: UniqueIndex<(u32, i32)>,
    /// `None` for vanishing (odd `n - l`) terms.
    terms: Vec<Option<Term>>,
}

impl ProjectionPlan {
    /// Deduplicates `(n, l)`, `l` and `(l, m)` over the non-vanishing terms
    /// and precomputes the scalar `A · B · C` of every term.
    pub fn new(support: IndexSupport) -> Result<Self> {
        let live: Vec<_> = support.iter().filter(|idx| !idx.is_vanishing()).copied().collect();
        let nl = UniqueIndex::from_keys(live.iter().map(|idx| idx.nl()));
        let l = UniqueIndex::from_keys(live.iter().map(|idx| idx.l));
        let lm = UniqueIndex::from_keys(live.iter().map(|idx| idx.lm()));

        let mut terms = Vec::with_capacity(support.len());
        let mut k = 0;
        for index in support.iter() {
            if index.is_vanishing() {
                terms.push(None);
                continue;
            }
            let scale = prefactor(index.n, index.l);
            if !scale.is_finite() {
                return Err(non_finite("prefactor", index.to_string(), None));
            }
            terms.push(Some(Term {
                prefactor: scale,
                nl: nl.slot(k),
                l: l.slot(k),
                lm: lm.slot(k),
            }));
            k += 1;
        }

        Ok(Self {
            support,
            nl,
            l,
            lm,
            terms,
        })
    }

    pub fn support(&self) -> &IndexSupport {
        &self.support
    }

    /// Number of requested terms (output length).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Distinct `(n, l)` pairs, i.e. hypergeometric rows per projection.
    pub fn unique_nl(&self) -> usize {
        self.nl.len()
    }

    pub fn unique_l(&self) -> usize {
        self.l.len()
    }

    /// Distinct `(l, m)` pairs, i.e. spherical-harmonic rows per projection.
    pub fn unique_lm(&self) -> usize {
        self.lm.len()
    }

    /// Projects one neighborhood onto every term of the support.
    pub fn project(&self, neighborhood: &Neighborhood, config: &ProjectionConfig) -> Result<Projection> {
        let admitted = neighborhood.admit(config)?;
        if admitted.excluded > 0 {
            log::debug!(
                "excluded {} of {} points at or beyond r_max={}",
                admitted.excluded,
                neighborhood.len(),
                config.r_max
            );
        }

        let tables = self.tables(neighborhood, &admitted)?;
        let w = Array1::from_iter(admitted.indices.iter().map(|&i| neighborhood.weight(i)));

        let mut coefficients = Array1::from_elem(self.terms.len(), Complex64::zero());
        for (k, term) in self.terms.iter().enumerate() {
            let Some(term) = term else { continue };
            let sum = Zip::from(&w)
                .and(tables.e.row(term.nl))
                .and(tables.f.row(term.l))
                .and(tables.y.row(term.lm))
                .fold(Complex64::zero(), |acc, &wi, &ei, &fi, &yi| acc + yi * (wi * ei * fi));
            let coeff = sum * term.prefactor;
            if !(coeff.re.is_finite() && coeff.im.is_finite()) {
                return Err(non_finite("coefficient", self.support.as_slice()[k].to_string(), None));
            }
            coefficients[k] = coeff;
        }

        Ok(Projection {
            coefficients,
            excluded: admitted.excluded,
        })
    }

    /// Evaluates the expansion `f(x) = Σ_k c_k · Z_k(x)` at every point of
    /// `points`, with `coefficients` in support order. Weights are not used.
    ///
    /// Points dropped under `SupportPolicy::Exclude` evaluate to zero.
    pub fn reconstruct(
        &self,
        coefficients: &ArrayView1<Complex64>,
        points: &Neighborhood,
        config: &ProjectionConfig,
    ) -> Result<Array1<Complex64>> {
        if coefficients.len() != self.len() {
            return Err(ZernikeError::ShapeMismatch {
                what: "coefficients",
                expected: self.len(),
                found: coefficients.len(),
            });
        }
        let admitted = points.admit(config)?;
        let tables = self.tables(points, &admitted)?;

        let mut values = Array1::from_elem(points.len(), Complex64::zero());
        for (k, term) in self.terms.iter().enumerate() {
            let Some(term) = term else { continue };
            let scale = coefficients[k] * term.prefactor;
            for (j, &i) in admitted.indices.iter().enumerate() {
                let radial = tables.e[[term.nl, j]] * tables.f[[term.l, j]];
                values[i] += scale * tables.y[[term.lm, j]].conj() * radial;
            }
        }

        if let Some((i, _)) = values
            .indexed_iter()
            .find(|(_, v)| !(v.re.is_finite() && v.im.is_finite()))
        {
            return Err(non_finite("expansion", "reconstruction".to_string(), Some(i)));
        }
        Ok(values)
    }

    /// Fills the `(unique keys × admitted points)` E, F and Y tables.
    fn tables(&self, neighborhood: &Neighborhood, admitted: &AdmittedPoints) -> Result<Tables> {
        let n_points = admitted.len();
        let rho = &admitted.rho;
        let points = &admitted.indices;
        let t = neighborhood.t();
        let p = neighborhood.p();

        // E: one row per unique (n, l)
        let e = Array2::from_shape_fn((self.nl.len(), n_points), |(u, j)| {
            let (n, l) = self.nl.keys()[u];
            radial_hyp2f1(n, l, rho[j])
        });
        if let Some(((u, j), _)) = e.indexed_iter().find(|(_, v)| !v.is_finite()) {
            let (n, l) = self.nl.keys()[u];
            return Err(non_finite("E", format!("(n={}, l={})", n, l), Some(points[j])));
        }

        // F: one row per unique l
        let f = Array2::from_shape_fn((self.l.len(), n_points), |(u, j)| {
            radial_power(self.l.keys()[u], rho[j])
        });
        if let Some(((u, j), _)) = f.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(non_finite("F", format!("(l={})", self.l.keys()[u]), Some(points[j])));
        }

        // Y: one row per unique (l, m), stored conjugated
        let y = Array2::from_shape_fn((self.lm.len(), n_points), |(u, j)| {
            let (l, m) = self.lm.keys()[u];
            angular_factor(l, m, t[points[j]], p[points[j]])
        });
        if let Some(((u, j), _)) = y
            .indexed_iter()
            .find(|(_, v)| !(v.re.is_finite() && v.im.is_finite()))
        {
            let (l, m) = self.lm.keys()[u];
            return Err(non_finite("Y", format!("(l={}, m={})", l, m), Some(points[j])));
        }

        Ok(Tables { e, f, y })
    }
}

/// One-shot projection: builds a plan for `support` and projects once.
/// Reuse a [`ProjectionPlan`] when many neighborhoods share a support.
pub fn project(
    neighborhood: &Neighborhood,
    support: &IndexSupport,
    config: &ProjectionConfig,
) -> Result<Projection> {
    ProjectionPlan::new(support.clone())?.project(neighborhood, config)
}

#[cfg(test)]
mod __test__;
