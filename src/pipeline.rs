// pipeline.rs - One conversion run, start to finish
//
//   Loaded -> FieldBuilt -> Smoothed -> Tessellated -> Serialized
//
// Strictly linear. Each stage consumes the previous stage's complete output;
// the first error aborts the run.

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::config::ReliefConfig;
use crate::error::Result;
use crate::field::{IntensityGrid, build_height_field, smooth};
use crate::mesh::{Mesh, StlReport, encode_stl, tessellate, write_stl};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    FieldBuilt,
    Smoothed,
    Tessellated,
    Serialized,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::FieldBuilt => "field built",
            Stage::Smoothed => "smoothed",
            Stage::Tessellated => "tessellated",
            Stage::Serialized => "serialized",
        };
        f.write_str(name)
    }
}

/// Run every stage up to, not including, serialization
pub fn build_mesh(grid: &IntensityGrid, config: &ReliefConfig) -> Result<Mesh> {
    config.validate()?;
    debug!("{}: {}x{} samples", Stage::Loaded, grid.width(), grid.height());

    let field = build_height_field(grid, config.spatial_scale, config.height_scale)?;
    debug!(
        "{}: spatial scale {}, height scale {}",
        Stage::FieldBuilt,
        config.spatial_scale,
        config.height_scale
    );

    if config.smoothing_sigma > 0.0 && is_constant(grid) {
        warn!("Input is uniform, smoothing has no effect");
    }
    let field = smooth(&field, config.smoothing_sigma)?;
    debug!("{}: sigma {}", Stage::Smoothed, config.smoothing_sigma);

    let mesh = tessellate(&field)?;
    debug!(
        "{}: {} vertices, {} triangles",
        Stage::Tessellated,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Full run, STL bytes returned in memory
pub fn convert_to_bytes(grid: &IntensityGrid, config: &ReliefConfig) -> Result<Vec<u8>> {
    let mesh = build_mesh(grid, config)?;
    let bytes = encode_stl(&mesh)?;
    debug!("{}: {} bytes", Stage::Serialized, bytes.len());
    Ok(bytes)
}

/// Full run, STL written to `output`
pub fn convert(
    grid: &IntensityGrid,
    config: &ReliefConfig,
    output: impl AsRef<Path>,
) -> Result<StlReport> {
    let mesh = build_mesh(grid, config)?;
    let report = write_stl(output, &mesh)?;
    debug!("{}: {}", Stage::Serialized, report.path.display());
    Ok(report)
}

fn is_constant(grid: &IntensityGrid) -> bool {
    let v = grid.values();
    let first = v[[0, 0]];
    v.iter().all(|&x| x == first)
}
