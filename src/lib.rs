// relief-engine - Grayscale height field to 3D relief mesh
//
// Pipeline:
//   1. Intensity grid (normalized [0, 1], row-major)
//   2. Height field: x/y on a regular grid, z = intensity * height scale
//   3. Optional Gaussian smoothing of z
//   4. Two triangles per grid cell
//   5. Binary STL with per-triangle normals
//
// Native callers use `pipeline::convert`. The browser gets `relief_stl`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod field;
pub mod mesh;
pub mod pipeline;

pub use config::ReliefConfig;
pub use error::{ReliefError, Result};
pub use field::{HeightField, IntensityGrid};
pub use mesh::{Mesh, StlReport};
pub use pipeline::{Stage, build_mesh, convert, convert_to_bytes};

/// Convert 8-bit luma samples to binary STL bytes
pub fn luma_to_stl(
    luma: &[u8],
    width: usize,
    height: usize,
    config: &ReliefConfig,
) -> Result<Vec<u8>> {
    config.validate()?;
    let grid = IntensityGrid::from_luma(width, height, luma)?;
    convert_to_bytes(&grid, config)
}

#[wasm_bindgen]
pub fn relief_stl(
    luma: &[u8],
    width: u32,
    height: u32,
    spatial_scale: f32,
    height_scale: f32,
    smoothing_sigma: f32,
) -> std::result::Result<js_sys::Uint8Array, JsError> {
    let config = ReliefConfig { spatial_scale, height_scale, smoothing_sigma };
    let bytes = luma_to_stl(luma, width as usize, height as usize, &config)?;
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}
