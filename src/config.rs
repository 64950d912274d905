// config.rs - Conversion parameters
//
// Validated once at the boundary, before any stage runs.

use crate::error::{ReliefError, Result};
use crate::field::MAX_SIGMA;

pub const DEFAULT_SPATIAL_SCALE: f32 = 1.0;
pub const DEFAULT_HEIGHT_SCALE: f32 = 10.0;
pub const DEFAULT_SMOOTHING_SIGMA: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReliefConfig {
    /// World units between adjacent samples (x and y)
    pub spatial_scale: f32,
    /// World height of a full-intensity sample
    pub height_scale: f32,
    /// Gaussian standard deviation in samples, 0 disables smoothing
    pub smoothing_sigma: f32,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            spatial_scale: DEFAULT_SPATIAL_SCALE,
            height_scale: DEFAULT_HEIGHT_SCALE,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
        }
    }
}

impl ReliefConfig {
    /// Default scales with smoothing turned off
    pub fn flat() -> Self {
        Self { smoothing_sigma: 0.0, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("spatial_scale", self.spatial_scale)?;
        check_finite("height_scale", self.height_scale)?;
        check_finite("smoothing_sigma", self.smoothing_sigma)?;

        if self.spatial_scale <= 0.0 {
            return Err(ReliefError::config(
                "spatial_scale",
                format!("must be > 0 (got {})", self.spatial_scale),
            ));
        }
        if self.height_scale < 0.0 {
            return Err(ReliefError::config(
                "height_scale",
                format!("must be >= 0 (got {})", self.height_scale),
            ));
        }
        if self.smoothing_sigma < 0.0 {
            return Err(ReliefError::config(
                "smoothing_sigma",
                format!("must be >= 0 (got {})", self.smoothing_sigma),
            ));
        }
        if self.smoothing_sigma > MAX_SIGMA {
            return Err(ReliefError::config(
                "smoothing_sigma",
                format!("must be <= {MAX_SIGMA} (got {})", self.smoothing_sigma),
            ));
        }
        Ok(())
    }
}

fn check_finite(param: &'static str, v: f32) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ReliefError::config(param, format!("must be finite (got {v})")))
    }
}
