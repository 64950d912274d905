// height.rs - Height field builder
//
// Structure-of-Arrays: one (height, width) plane per coordinate.
//   x = column * spatial_scale
//   y = row * spatial_scale
//   z = intensity * height_scale
// x and y are fixed at construction; only z may be replaced.

use ndarray::Array2;

use super::IntensityGrid;
use crate::error::{ReliefError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    x: Array2<f32>,
    y: Array2<f32>,
    z: Array2<f32>,
}

impl HeightField {
    pub fn width(&self) -> usize {
        self.z.ncols()
    }

    pub fn height(&self) -> usize {
        self.z.nrows()
    }

    pub fn x(&self) -> &Array2<f32> {
        &self.x
    }

    pub fn y(&self) -> &Array2<f32> {
        &self.y
    }

    pub fn z(&self) -> &Array2<f32> {
        &self.z
    }

    /// World position of sample (row, col)
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> [f32; 3] {
        [self.x[[row, col]], self.y[[row, col]], self.z[[row, col]]]
    }

    /// Same grid, new height plane
    pub(crate) fn with_z(&self, z: Array2<f32>) -> Self {
        debug_assert_eq!(z.dim(), self.z.dim());
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z,
        }
    }
}

/// Sample an intensity grid onto a regular world-space grid
pub fn build_height_field(
    grid: &IntensityGrid,
    spatial_scale: f32,
    height_scale: f32,
) -> Result<HeightField> {
    // Written as negations so NaN falls through to the error
    if !(spatial_scale > 0.0 && spatial_scale.is_finite()) {
        return Err(ReliefError::config(
            "spatial_scale",
            format!("must be > 0 (got {spatial_scale})"),
        ));
    }
    if !(height_scale >= 0.0 && height_scale.is_finite()) {
        return Err(ReliefError::config(
            "height_scale",
            format!("must be >= 0 (got {height_scale})"),
        ));
    }

    let dim = grid.values().dim();
    let (h, w) = dim;
    let extent = (w.max(h) - 1) as f32 * spatial_scale;
    if !extent.is_finite() {
        return Err(ReliefError::config(
            "spatial_scale",
            format!("{spatial_scale} overflows the extent of a {w}x{h} grid"),
        ));
    }

    Ok(HeightField {
        x: Array2::from_shape_fn(dim, |(_, col)| col as f32 * spatial_scale),
        y: Array2::from_shape_fn(dim, |(row, _)| row as f32 * spatial_scale),
        z: grid.values().mapv(|v| v * height_scale),
    })
}
