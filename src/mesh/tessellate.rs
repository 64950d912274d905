// tessellate.rs - Regular grid to triangle list
//
// Each cell splits along its v2-v3 diagonal:
//
//   v1 ---- v2        A = (v1, v2, v3)
//   |     / |         B = (v2, v4, v3)
//   |   /   |
//   | /     |         v1 = row * W + col
//   v3 ---- v4        v2 = v1 + 1, v3 = v1 + W, v4 = v3 + 1
//
// With x growing along columns and y along rows, both winds face +z.

use crate::error::{ReliefError, Result};
use crate::field::HeightField;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Fail on the first triangle that points past the vertex array
    pub fn check_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        for (t, tri) in self.triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&v| v as usize >= n) {
                return Err(ReliefError::geometry(format!(
                    "triangle {t} references vertex {bad}, mesh has {n}"
                )));
            }
        }
        Ok(())
    }

    /// Corner positions of triangle `t`
    #[inline]
    pub fn corners(&self, t: usize) -> [[f32; 3]; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }
}

/// Triangle count for a `width` x `height` grid
pub fn expected_triangles(width: usize, height: usize) -> usize {
    2 * width.saturating_sub(1) * height.saturating_sub(1)
}

pub fn tessellate(field: &HeightField) -> Result<Mesh> {
    let (w, h) = (field.width(), field.height());
    if w < 2 || h < 2 {
        return Err(ReliefError::input(format!(
            "cannot tessellate a {w}x{h} field"
        )));
    }
    if u32::try_from(w * h).is_err() {
        return Err(ReliefError::geometry(format!(
            "{w}x{h} samples exceed the u32 vertex index range"
        )));
    }

    let mut vertices = Vec::with_capacity(w * h);
    for ((&x, &y), &z) in field.x().iter().zip(field.y()).zip(field.z()) {
        vertices.push([x, y, z]);
    }

    let (w, h) = (w as u32, h as u32);
    let mut triangles = Vec::with_capacity(expected_triangles(w as usize, h as usize));
    for row in 0..h - 1 {
        for col in 0..w - 1 {
            let v1 = row * w + col;
            let v2 = v1 + 1;
            let v3 = v1 + w;
            let v4 = v3 + 1;

            triangles.push([v1, v2, v3]);
            triangles.push([v2, v4, v3]);
        }
    }

    Ok(Mesh { vertices, triangles })
}
