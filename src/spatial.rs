//! World-space geometry: the bounding volume the CSG tree reasons with.

use nalgebra::{Matrix4, Point3, Vector3};
use parry3d::bounding_volume::Aabb;

pub use parry3d::math::Real;

/// A point in the world space an octree is embedded in.
pub type WorldPoint = Point3<Real>;

/// A vector in world space.
pub type WorldVector = Vector3<Real>;

/// Axis-Aligned Cube.
///
/// All bounding volumes here are cubes, not general boxes: the octree
/// subdivides a cube, so a cube is what its root must cover. Kept as a
/// minimum corner plus a single side length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AACube {
    pub origin: WorldPoint,
    pub length: Real,
}

impl AACube {
    pub fn new(origin: WorldPoint, length: Real) -> Self {
        Self { origin, length }
    }

    /// Cube of side `length` centered at the world origin.
    pub fn centered(length: Real) -> Self {
        let half = length / 2.0;
        Self {
            origin: Point3::new(-half, -half, -half),
            length,
        }
    }

    /// Smallest cube whose minimum corner is `mins` and which covers the box
    /// spanned up to `maxs`: the side is re-cubed to the largest extent.
    pub fn from_corners(mins: WorldPoint, maxs: WorldPoint) -> Self {
        Self {
            origin: mins,
            length: (maxs - mins).max(),
        }
    }

    /// The corner opposite [origin](Self::origin).
    pub fn maxs(&self) -> WorldPoint {
        self.origin + WorldVector::repeat(self.length)
    }

    pub fn center(&self) -> WorldPoint {
        self.origin + WorldVector::repeat(self.length / 2.0)
    }

    pub fn contains(&self, p: &WorldPoint) -> bool {
        let o = &self.origin;
        let l = self.length;
        (p.x >= o.x && p.x < o.x + l)
            && (p.y >= o.y && p.y < o.y + l)
            && (p.z >= o.z && p.z < o.z + l)
    }

    /// Smallest cube covering both operands: componentwise min/max of the
    /// corners, then re-cubed.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(
            self.origin.inf(&other.origin),
            self.maxs().sup(&other.maxs()),
        )
    }

    /// Axis-aligned cube enclosing this cube's image under an affine
    /// transform, built from the matrix columns instead of transforming all
    /// eight corners.
    pub fn transformed(&self, m: &Matrix4<Real>) -> Self {
        let mins = self.origin;
        let maxs = self.maxs();

        let mut out_mins: WorldVector = m.column(3).xyz();
        let mut out_maxs = out_mins;
        for axis in 0..3 {
            let column: WorldVector = m.column(axis).xyz();
            let lo = column * mins[axis];
            let hi = column * maxs[axis];
            out_mins += lo.inf(&hi);
            out_maxs += lo.sup(&hi);
        }

        Self::from_corners(Point3::from(out_mins), Point3::from(out_maxs))
    }

    /// Interop with parry's bounding volumes.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.origin, self.maxs())
    }
}
