//! # holo_zernike
//!
//! 3D Zernike coefficients of atomic neighborhoods. A neighborhood is a set
//! of points in spherical coordinates `(r, t, p)` around a center; its
//! coefficient for an index `(n, l, m)` is
//!
//! ```text
//! c(n, l, m) = A · B · C · Σ_i w_i · E(ρ_i) · ρ_i^l · conj(Y_l^m(t_i, p_i))
//! ```
//!
//! with `ρ = r / r_max`. [`ops::zernike_coeff_lm`] evaluates one term directly,
//! [`ProjectionPlan`] evaluates a whole index support with shared radial and
//! angular tables, and [`project_batch`] runs a plan over many neighborhoods
//! in parallel.

pub mod config;
pub mod error;
pub mod index;
pub mod neighborhood;
pub mod ops;
pub mod projection;

#[cfg(feature = "python")]
pub mod bindings;

pub use config::{ProjectionConfig, SupportPolicy, DEFAULT_R_MAX};
pub use error::{Result, ZernikeError};
pub use index::{IndexSupport, ZernikeIndex};
pub use neighborhood::{AdmittedPoints, Neighborhood};
pub use projection::{project, project_batch, project_batch_isolated, Projection, ProjectionBatch, ProjectionPlan};
