//! Wavefront OBJ emission.
//!
//! Every non-void voxel is dumped as an independent cube: eight vertices and
//! twelve triangles, with the six axis normals shared by the whole file.
//! Deduplication, neighbor-aware culling and simplification are left to
//! downstream consumers.

use std::io::{self, Write};

use nalgebra::Point3;

use crate::spatial::Real;
use crate::tree::Octree;
use crate::voxel::Corner::{self, *};
use crate::voxel::{Face, UNKNOWN, VOID};

/// Two outward-wound triangles per cube face, indexed into the voxel's own
/// eight corners in the order [Face::all] walks the faces.
const TRIANGLES: [[[Corner; 3]; 2]; 6] = [
    // left, -x
    [
        [RightBottomFront, RightTopFront, LeftTopFront],
        [RightBottomFront, LeftTopFront, LeftBottomFront],
    ],
    // right, +x
    [
        [LeftBottomBack, LeftTopBack, RightTopBack],
        [LeftBottomBack, RightTopBack, RightBottomBack],
    ],
    // bottom, -y
    [
        [RightBottomBack, RightBottomFront, LeftBottomFront],
        [RightBottomBack, LeftBottomFront, LeftBottomBack],
    ],
    // top, +y
    [
        [RightTopFront, RightTopBack, LeftTopBack],
        [RightTopFront, LeftTopBack, LeftTopFront],
    ],
    // back, -z
    [
        [LeftBottomFront, LeftTopFront, LeftTopBack],
        [LeftBottomFront, LeftTopBack, LeftBottomBack],
    ],
    // front, +z
    [
        [RightBottomBack, RightTopBack, RightTopFront],
        [RightBottomBack, RightTopFront, RightBottomFront],
    ],
];

/// Write an octree as a Wavefront OBJ cube soup.
///
/// The six face normals go out once at the top of the file; then, for every
/// voxel that is not [VOID], its eight corners (mapped through the octree's
/// world transform) and twelve `f v//n` triangles. Indices are 1-based as
/// OBJ requires.
///
/// # Panics
///
/// Panics if the octree still contains an [UNKNOWN] material; emission only
/// makes sense on a fully built octree.
pub fn write_obj<W: Write>(octree: &Octree, out: &mut W) -> io::Result<()> {
    for face in Face::all() {
        let n = face.normal();
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let transform = octree.transform();
    // running 1-based vertex index of the current cube's first corner
    let mut base: u64 = 1;
    for &voxel in octree.voxels() {
        assert!(
            voxel.material() != UNKNOWN,
            "mesh emission on an octree with undecided voxels"
        );
        if voxel.material() == VOID {
            continue;
        }

        for corner in voxel.corners() {
            let p = transform.transform_point(&Point3::new(
                Real::from(corner.x),
                Real::from(corner.y),
                Real::from(corner.z),
            ));
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }

        for (normal, triangles) in TRIANGLES.iter().enumerate() {
            for triangle in triangles {
                write!(out, "f")?;
                for &corner in triangle {
                    write!(out, " {}//{}", base + corner as u64, normal + 1)?;
                }
                writeln!(out)?;
            }
        }

        base += 8;
    }

    Ok(())
}
