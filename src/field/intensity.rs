// intensity.rs - Normalized intensity input
//
// Row-major, shape (height, width), every value in [0, 1].

use ndarray::Array2;

use crate::error::{ReliefError, Result};

pub const MIN_SIDE: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct IntensityGrid {
    values: Array2<f32>,
}

impl IntensityGrid {
    /// Wrap an already normalized (height, width) array
    pub fn new(values: Array2<f32>) -> Result<Self> {
        let (h, w) = values.dim();
        if w < MIN_SIDE || h < MIN_SIDE {
            return Err(ReliefError::input(format!(
                "intensity grid is {w}x{h}, need at least {MIN_SIDE}x{MIN_SIDE}"
            )));
        }

        if let Some(((i, j), v)) = values
            .indexed_iter()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(ReliefError::input(format!(
                "intensity {v} at row {i}, column {j} is outside [0, 1]"
            )));
        }

        Ok(Self { values })
    }

    /// Build from a flat row-major buffer of normalized samples
    pub fn from_normalized(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        let len = data.len();
        let values = Array2::from_shape_vec((height, width), data).map_err(|_| {
            ReliefError::input(format!(
                "{len} samples do not fill a {width}x{height} grid"
            ))
        })?;
        Self::new(values)
    }

    /// Build from 8-bit luma samples, dividing by 255
    pub fn from_luma(width: usize, height: usize, luma: &[u8]) -> Result<Self> {
        let data = luma.iter().map(|&p| p as f32 / 255.0).collect();
        Self::from_normalized(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }
}
