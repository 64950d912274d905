// stl.rs - Binary STL encoding
//
// Layout (little-endian):
//   [80]  header, ASCII tag + zero fill
//   u32   triangle count
//   per triangle, 50 bytes:
//     f32 x 3   unit normal
//     f32 x 9   corners a, b, c
//     u16       attribute byte count (0)
//
// Files are encoded in memory, written beside the target, then renamed,
// so a failed run never leaves a truncated file at the destination.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

use super::Mesh;
use crate::error::{ReliefError, Result};

pub const HEADER_LEN: usize = 80;
pub const RECORD_LEN: usize = 50;

const HEADER_TAG: &[u8] = b"relief-engine binary stl";

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of a successful write
#[derive(Clone, Debug, PartialEq)]
pub struct StlReport {
    pub path: PathBuf,
    pub triangles: usize,
    pub bytes: usize,
}

/// Unit normal of (a, b, c) from (b - a) x (c - a), zero when degenerate.
///
/// Worked in f64 and divided by the largest component before taking the
/// length, so any finite f32 corners give a unit normal.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let d = |p: [f32; 3], k: usize| f64::from(p[k]) - f64::from(a[k]);
    let (ux, uy, uz) = (d(b, 0), d(b, 1), d(b, 2));
    let (vx, vy, vz) = (d(c, 0), d(c, 1), d(c, 2));

    let nx = uy * vz - uz * vy;
    let ny = uz * vx - ux * vz;
    let nz = ux * vy - uy * vx;

    let m = nx.abs().max(ny.abs()).max(nz.abs());
    if !(m > 0.0 && m.is_finite()) {
        return [0.0, 0.0, 0.0];
    }
    let (nx, ny, nz) = (nx / m, ny / m, nz / m);
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    [(nx / len) as f32, (ny / len) as f32, (nz / len) as f32]
}

/// Size in bytes of an STL holding `triangles` records
pub fn encoded_len(triangles: usize) -> usize {
    HEADER_LEN + 4 + triangles * RECORD_LEN
}

pub fn encode_stl(mesh: &Mesh) -> Result<Vec<u8>> {
    mesh.check_indices()?;
    let count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        ReliefError::geometry(format!(
            "{} triangles do not fit the STL count field",
            mesh.triangle_count()
        ))
    })?;

    let mut out = Vec::with_capacity(encoded_len(mesh.triangle_count()));

    let mut header = [0u8; HEADER_LEN];
    header[..HEADER_TAG.len()].copy_from_slice(HEADER_TAG);
    out.extend_from_slice(&header);
    out.extend_from_slice(&count.to_le_bytes());

    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.corners(t);
        let n = face_normal(a, b, c);
        for v in [n, a, b, c] {
            for comp in v {
                out.extend_from_slice(&comp.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    debug_assert_eq!(out.len(), encoded_len(mesh.triangle_count()));
    Ok(out)
}

/// Encode `mesh` and atomically replace `path` with it
pub fn write_stl(path: impl AsRef<Path>, mesh: &Mesh) -> Result<StlReport> {
    let path = path.as_ref();
    let bytes = encode_stl(mesh)?;
    write_atomic(path, &bytes)?;

    let report = StlReport {
        path: path.to_path_buf(),
        triangles: mesh.triangle_count(),
        bytes: bytes.len(),
    };
    info!(
        "Wrote {} ({} triangles, {} bytes)",
        report.path.display(),
        report.triangles,
        report.bytes
    );
    Ok(report)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = staging_path(path);
    debug!("Staging {} bytes at {}", bytes.len(), tmp.display());

    let res = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = res {
        let _ = fs::remove_file(&tmp);
        return Err(ReliefError::io(path, e));
    }
    Ok(())
}

/// Hidden sibling of `path`, same directory so the rename stays on one filesystem.
/// Unique per process and per call, so concurrent writers never share one.
fn staging_path(path: &Path) -> PathBuf {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(
        ".{}.{}.{seq}.tmp",
        target_name(path),
        std::process::id()
    ))
}

fn target_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.stl".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(z: [f32; 4]) -> Mesh {
        Mesh {
            vertices: vec![
                [0.0, 0.0, z[0]],
                [1.0, 0.0, z[1]],
                [0.0, 1.0, z[2]],
                [1.0, 1.0, z[3]],
            ],
            triangles: vec![[0, 1, 2], [1, 3, 2]],
        }
    }

    fn f32_at(bytes: &[u8], at: usize) -> f32 {
        f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("relief-stl-{}-{name}", std::process::id()))
    }

    /// Staging files for `path` still sitting in its directory
    fn leftovers(path: &Path) -> usize {
        let prefix = format!(".{}.", target_name(path));
        let Ok(dir) = fs::read_dir(path.parent().unwrap()) else { return 0 };
        dir.filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with(&prefix) && name.ends_with(".tmp")
            })
            .count()
    }

    fn assert_unit_up(n: [f32; 3]) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert_relative_eq!(len, 1.0, epsilon = 1e-5);
        assert!(n[2] > 0.0, "{n:?}");
    }

    #[test]
    fn flat_quad_faces_up() {
        let mesh = quad([5.0; 4]);
        for t in 0..2 {
            let [a, b, c] = mesh.corners(t);
            assert_eq!(face_normal(a, b, c), [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn sloped_normal_is_unit() {
        let [a, b, c] = quad([0.0, 3.0, 1.0, 2.0]).corners(0);
        let n = face_normal(a, b, c);
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert_relative_eq!(len, 1.0, epsilon = 1e-5);
        assert!(n[2] > 0.0);
        // rising along +x tilts the normal toward -x
        assert!(n[0] < 0.0);
    }

    #[test]
    fn huge_and_tiny_triangles_get_unit_normals() {
        assert_eq!(face_normal([0.0; 3], [1e20, 0.0, 0.0], [0.0, 1e20, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(face_normal([0.0; 3], [1e-25, 0.0, 0.0], [0.0, 1e-25, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(face_normal([0.0; 3], [f32::MAX, 0.0, 0.0], [0.0, f32::MAX, 0.0]), [0.0, 0.0, 1.0]);

        let s = 1e-30;
        assert_unit_up(face_normal([0.0, 0.0, 0.0], [s, 0.0, 2.0 * s], [0.0, s, -s]));
        let s = 1e30;
        assert_unit_up(face_normal([0.0, 0.0, 0.0], [s, 0.0, 2.0 * s], [0.0, s, -s]));
    }

    #[test]
    fn tiny_flat_quad_faces_up() {
        let mut mesh = quad([5.0; 4]);
        for v in &mut mesh.vertices {
            v[0] *= 1e-25;
            v[1] *= 1e-25;
        }
        let bytes = encode_stl(&mesh).unwrap();
        let first = HEADER_LEN + 4;
        assert_eq!(f32_at(&bytes, first + 8), 1.0);
        assert_eq!(f32_at(&bytes, first + RECORD_LEN + 8), 1.0);
    }

    #[test]
    fn staging_names_are_unique() {
        let path = scratch("same.stl");
        let a = staging_path(&path);
        let b = staging_path(&path);
        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
    }

    #[test]
    fn concurrent_writes_to_one_target() {
        let path = scratch("shared.stl");
        let handles: Vec<_> = (0..8)
            .map(|k| {
                let path = path.clone();
                std::thread::spawn(move || write_stl(&path, &quad([k as f32; 4])))
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 184);
        assert_eq!(leftovers(&path), 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn degenerate_normal_is_zero() {
        let n = face_normal([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert_eq!(n, [0.0, 0.0, 0.0]);
        let n = face_normal([1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
        assert_eq!(n, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn layout_matches_format() {
        let bytes = encode_stl(&quad([5.0; 4])).unwrap();
        assert_eq!(bytes.len(), 184);
        assert_eq!(bytes.len(), encoded_len(2));
        assert_eq!(&bytes[..HEADER_TAG.len()], HEADER_TAG);
        assert!(bytes[HEADER_TAG.len()..HEADER_LEN].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 2);

        // second record: normal, then v2, v4, v3
        let rec = HEADER_LEN + 4 + RECORD_LEN;
        assert_eq!(f32_at(&bytes, rec + 8), 1.0);
        assert_eq!(f32_at(&bytes, rec + 12), 1.0);
        assert_eq!(f32_at(&bytes, rec + 24), 1.0);
        assert_eq!(f32_at(&bytes, rec + 28), 1.0);
        assert_eq!(f32_at(&bytes, rec + 32), 5.0);
        assert_eq!(&bytes[rec + 48..rec + 50], &[0, 0]);
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut mesh = quad([0.0; 4]);
        mesh.triangles.push([0, 1, 9]);
        let err = encode_stl(&mesh).unwrap_err();
        assert!(matches!(err, ReliefError::GeometryInvariant { .. }));
    }

    #[test]
    fn write_replaces_target() {
        let path = scratch("replace.stl");
        fs::write(&path, b"old contents").unwrap();

        let report = write_stl(&path, &quad([1.0; 4])).unwrap();
        assert_eq!(report.triangles, 2);
        assert_eq!(report.bytes, 184);
        assert_eq!(fs::read(&path).unwrap().len(), 184);
        assert_eq!(leftovers(&path), 0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_target_leaves_nothing() {
        let path = scratch("missing-dir").join("out.stl");
        let err = write_stl(&path, &quad([1.0; 4])).unwrap_err();
        assert_eq!(err.kind(), "IOError");
        assert!(!path.exists());
        assert_eq!(leftovers(&path), 0);
    }

    #[test]
    fn failed_encode_keeps_previous_file() {
        let path = scratch("keep.stl");
        fs::write(&path, b"previous").unwrap();

        let mut mesh = quad([0.0; 4]);
        mesh.triangles.push([7, 7, 7]);
        assert!(write_stl(&path, &mesh).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");

        fs::remove_file(&path).unwrap();
    }
}
