// field/ - Height field construction
//
// Intensity samples in, (x, y, z) sample planes out.
// Each step returns a new owned field; inputs are never touched.

mod intensity;
mod height;
mod smooth;

pub use intensity::IntensityGrid;
pub use height::{HeightField, build_height_field};
pub use smooth::{MAX_SIGMA, TRUNCATE, gaussian_kernel, smooth};
