// mesh/ - Indexed triangle mesh and its binary STL encoding
//
// Vertices and triangles live in flat arrays indexed by u32.

mod tessellate;
mod stl;

pub use tessellate::{Mesh, expected_triangles, tessellate};
pub use stl::{HEADER_LEN, RECORD_LEN, StlReport, encode_stl, encoded_len, face_normal, write_stl};
