// load.rs - Image file to intensity grid
//
// Decodes anything the image crate reads, drops color to 8-bit luma,
// and optionally mirrors left-right so the printed relief reads correctly
// when viewed from the front.

use std::path::Path;

use image::imageops;
use log::debug;
use relief_engine::{IntensityGrid, ReliefError, Result};

pub fn load_grid(path: &Path, mirror: bool) -> Result<IntensityGrid> {
    let img = image::open(path)
        .map_err(|e| ReliefError::input(format!("cannot read {}: {e}", path.display())))?;
    let mut luma = img.to_luma8();
    if mirror {
        imageops::flip_horizontal_in_place(&mut luma);
    }

    let (w, h) = luma.dimensions();
    debug!("Decoded {} as {}x{} luma", path.display(), w, h);
    IntensityGrid::from_luma(w as usize, h as usize, luma.as_raw())
}
