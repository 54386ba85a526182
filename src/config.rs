use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ZernikeError};

/// Neighborhood radius used by the hologram pipeline (Å).
pub const DEFAULT_R_MAX: f64 = 10.0;

/// What to do with points at or beyond `r_max`.
///
/// The hypergeometric radial factor is only stable for `r / r_max < 1`, so
/// such points never enter a sum silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportPolicy {
    /// Drop the point from every sum and count it in `Projection::excluded`.
    #[default]
    Exclude,
    /// Fail the neighborhood with `ZernikeError::OutOfSupport`.
    Reject,
}

impl FromStr for SupportPolicy {
    type Err = ZernikeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exclude" => Ok(SupportPolicy::Exclude),
            "reject" => Ok(SupportPolicy::Reject),
            other => Err(ZernikeError::InvalidConfig(format!(
                "unknown support policy '{}' (expected 'exclude' or 'reject')",
                other
            ))),
        }
    }
}

impl fmt::Display for SupportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportPolicy::Exclude => write!(f, "exclude"),
            SupportPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Zernike 투영 설정
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    /// Support radius; points are projected as `r / r_max`.
    pub r_max: f64,
    pub policy: SupportPolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            r_max: DEFAULT_R_MAX,
            policy: SupportPolicy::default(),
        }
    }
}

impl ProjectionConfig {
    pub fn new(r_max: f64) -> Result<Self> {
        let config = Self {
            r_max,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: SupportPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fields are public, so every entry point re-checks before use.
    pub fn validate(&self) -> Result<()> {
        if !self.r_max.is_finite() || self.r_max <= 0.0 {
            return Err(ZernikeError::InvalidConfig(format!(
                "r_max must be finite and positive, got {}",
                self.r_max
            )));
        }
        Ok(())
    }
}
