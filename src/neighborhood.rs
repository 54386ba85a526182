use ndarray::ArrayView1;

use crate::config::{ProjectionConfig, SupportPolicy};
use crate::error::{Result, ZernikeError};

/// One neighborhood's atoms in spherical coordinates, borrowed from the caller.
///
/// `t` is the polar angle in `[0, π]`, `p` the azimuth in `[0, 2π)`. Without
/// weights every point counts with weight 1.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    r: ArrayView1<'a, f64>,
    t: ArrayView1<'a, f64>,
    p: ArrayView1<'a, f64>,
    weights: Option<ArrayView1<'a, f64>>,
}

/// Points of a neighborhood that fall inside the basis support.
#[derive(Debug, Clone, Default)]
pub struct AdmittedPoints {
    /// Positions in the original neighborhood.
    pub indices: Vec<usize>,
    /// `r / r_max` for each admitted point.
    pub rho: Vec<f64>,
    pub excluded: usize,
}

impl AdmittedPoints {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<'a> Neighborhood<'a> {
    pub fn new(
        r: ArrayView1<'a, f64>,
        t: ArrayView1<'a, f64>,
        p: ArrayView1<'a, f64>,
    ) -> Result<Self> {
        check_len("polar angles", r.len(), t.len())?;
        check_len("azimuthal angles", r.len(), p.len())?;
        Ok(Self {
            r,
            t,
            p,
            weights: None,
        })
    }

    pub fn with_weights(mut self, weights: ArrayView1<'a, f64>) -> Result<Self> {
        check_len("weights", self.r.len(), weights.len())?;
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn r(&self) -> ArrayView1<'a, f64> {
        self.r
    }

    pub fn t(&self) -> ArrayView1<'a, f64> {
        self.t
    }

    pub fn p(&self) -> ArrayView1<'a, f64> {
        self.p
    }

    #[inline]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights.map_or(1.0, |w| w[i])
    }

    /// Applies the support policy and computes `rho = r / r_max`.
    ///
    /// Negative or non-finite radii, non-finite angles and non-finite weights
    /// are rejected regardless of policy.
    pub fn admit(&self, config: &ProjectionConfig) -> Result<AdmittedPoints> {
        config.validate()?;
        let mut admitted = AdmittedPoints {
            indices: Vec::with_capacity(self.len()),
            rho: Vec::with_capacity(self.len()),
            excluded: 0,
        };

        for i in 0..self.len() {
            let r = self.r[i];
            if !r.is_finite()
                || r < 0.0
                || !self.t[i].is_finite()
                || !self.p[i].is_finite()
                || !self.weight(i).is_finite()
            {
                return Err(ZernikeError::InvalidPoint { point: i, r });
            }

            if r >= config.r_max {
                match config.policy {
                    SupportPolicy::Exclude => {
                        admitted.excluded += 1;
                        continue;
                    }
                    SupportPolicy::Reject => {
                        return Err(ZernikeError::OutOfSupport {
                            point: i,
                            r,
                            r_max: config.r_max,
                        });
                    }
                }
            }

            admitted.indices.push(i);
            admitted.rho.push(r / config.r_max);
        }

        Ok(admitted)
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(ZernikeError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
