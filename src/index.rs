//! # Zernike 기저 인덱스
//!
//! A requested expansion term is a triple `(n, l, m)`. An [`IndexSupport`] is
//! the ordered list of triples for one computation; coefficients are always
//! returned in that order.

use std::fmt;

use crate::error::{Result, ZernikeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZernikeIndex {
    pub n: u32,
    pub l: u32,
    pub m: i32,
}

impl ZernikeIndex {
    pub fn new(n: u32, l: u32, m: i32) -> Result<Self> {
        let index = Self { n, l, m };
        index.validate()?;
        Ok(index)
    }

    /// `l <= n` and `|m| <= l`. Odd `n - l` is valid, the term just vanishes.
    pub fn validate(&self) -> Result<()> {
        if self.l > self.n {
            return Err(self.invalid("l must not exceed n"));
        }
        if self.m.unsigned_abs() > self.l {
            return Err(self.invalid("|m| must not exceed l"));
        }
        Ok(())
    }

    /// The basis function is identically zero when `n - l` is odd.
    #[inline]
    pub fn is_vanishing(&self) -> bool {
        (self.n - self.l) % 2 == 1
    }

    #[inline]
    pub fn nl(&self) -> (u32, u32) {
        (self.n, self.l)
    }

    #[inline]
    pub fn lm(&self) -> (u32, i32) {
        (self.l, self.m)
    }

    fn invalid(&self, reason: &'static str) -> ZernikeError {
        ZernikeError::InvalidIndex {
            n: self.n,
            l: self.l,
            m: self.m,
            reason,
        }
    }
}

impl fmt::Display for ZernikeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(n={}, l={}, m={})", self.n, self.l, self.m)
    }
}

/// Validated, ordered list of requested triples.
///
/// Repeated `(n, l)` and `(l, m)` pairs are expected; the projection plan
/// deduplicates them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSupport {
    indices: Vec<ZernikeIndex>,
}

impl IndexSupport {
    pub fn new(indices: Vec<ZernikeIndex>) -> Result<Self> {
        for index in &indices {
            index.validate()?;
        }
        Ok(Self { indices })
    }

    /// Builds a support from parallel `n[]`, `l[]`, `m[]` arrays.
    pub fn from_arrays(n: &[u32], l: &[u32], m: &[i32]) -> Result<Self> {
        if l.len() != n.len() {
            return Err(ZernikeError::ShapeMismatch {
                what: "l indices",
                expected: n.len(),
                found: l.len(),
            });
        }
        if m.len() != n.len() {
            return Err(ZernikeError::ShapeMismatch {
                what: "m indices",
                expected: n.len(),
                found: m.len(),
            });
        }
        let indices = n
            .iter()
            .zip(l)
            .zip(m)
            .map(|((&n, &l), &m)| ZernikeIndex::new(n, l, m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    /// Dense hologram grid: for every radial order in `radial_orders` (in the
    /// given order), all `l <= min(n, l_max)` with even `n - l`, and
    /// `m = -l..=l`.
    pub fn hologram(radial_orders: &[u32], l_max: u32) -> Self {
        let mut indices = Vec::new();
        for &n in radial_orders {
            for l in (0..=n.min(l_max)).filter(|l| (n - l) % 2 == 0) {
                let l_signed = l as i32;
                indices.extend((-l_signed..=l_signed).map(|m| ZernikeIndex { n, l, m }));
            }
        }
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZernikeIndex> {
        self.indices.iter()
    }

    pub fn as_slice(&self) -> &[ZernikeIndex] {
        &self.indices
    }

    pub fn get(&self, i: usize) -> Option<&ZernikeIndex> {
        self.indices.get(i)
    }
}

impl<'a> IntoIterator for &'a IndexSupport {
    type Item = &'a ZernikeIndex;
    type IntoIter = std::slice::Iter<'a, ZernikeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}
