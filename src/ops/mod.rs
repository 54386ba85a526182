pub mod coords;
pub mod dedup;
pub mod special;
pub mod zernike;

pub use self::coords::{cartesian_to_spherical, spherical_to_cartesian};
pub use self::dedup::UniqueIndex;
pub use self::special::{binomial, hyp2f1, legendre_normalized, sph_harm};
pub use self::zernike::{zernike_coeff_l, zernike_coeff_lm, zernike_coeff_lm_counted, zernike_coeff_lm_rows};
