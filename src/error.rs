use thiserror::Error;

/// Zernike 투영 과정에서 발생하는 오류
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZernikeError {
    #[error("invalid index (n={n}, l={l}, m={m}): {reason}")]
    InvalidIndex {
        n: u32,
        l: u32,
        m: i32,
        reason: &'static str,
    },

    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("point {point} has an invalid coordinate or weight (r={r})")]
    InvalidPoint { point: usize, r: f64 },

    #[error("point {point} lies outside the basis support (r={r} >= r_max={r_max})")]
    OutOfSupport { point: usize, r: f64, r_max: f64 },

    #[error("non-finite {factor} factor for {key}{}", at_point(.point))]
    NonFinite {
        factor: &'static str,
        key: String,
        point: Option<usize>,
    },

    #[error("neighborhood {index}: {source}")]
    Neighborhood {
        index: usize,
        #[source]
        source: Box<ZernikeError>,
    },
}

impl ZernikeError {
    pub(crate) fn in_neighborhood(self, index: usize) -> Self {
        ZernikeError::Neighborhood {
            index,
            source: Box::new(self),
        }
    }
}

fn at_point(point: &Option<usize>) -> String {
    match point {
        Some(point) => format!(" at point {}", point),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ZernikeError>;
