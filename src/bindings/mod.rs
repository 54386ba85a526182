mod coords;
mod zernike;

pub use coords::*;
pub use zernike::*;

use pyo3::prelude::*;
use pyo3::types::PyModule;

/// holo_zernike - 3D Zernike holograms of atomic neighborhoods
#[pymodule]
pub fn holo_zernike(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    // Zernike coefficients
    zernike::register(m)?;
    // Coordinate conversion
    coords::register(m)?;
    Ok(())
}
