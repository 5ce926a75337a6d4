use nalgebra::Matrix4;

use crate::spatial::Real;
use crate::voxel::Material;

/// Handle to a node interned in a [Scene](super::Scene) arena.
///
/// Stable for the life of the owning scene; the arena only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// A CSG node: a solid primitive, a boolean operator over two subtrees, an
/// affine change of coordinates, or a top-level build marker.
///
/// The node set is closed: distance evaluation dispatches on the
/// discriminant, and children are arena indices rather than owned pointers,
/// so the whole tree lives in one contiguous allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// Sphere of the given radius, centered at the origin.
    Sphere { radius: Real },
    /// Axis-aligned cube of the given side, centered at the origin.
    Cube { side: Real },
    /// Points belonging to either operand.
    Union { left: NodeId, right: NodeId },
    /// Points belonging to both operands.
    Intersection { left: NodeId, right: NodeId },
    /// Points of `left` not belonging to `right`.
    Difference { left: NodeId, right: NodeId },
    /// The child solid placed under an affine change of coordinates.
    ///
    /// `world_to_object` is the precomputed inverse of `object_to_world`;
    /// distance queries map the point into object space through it.
    Transform {
        child: NodeId,
        object_to_world: Matrix4<Real>,
        world_to_object: Matrix4<Real>,
    },
    /// Root marker pairing a subtree with the material painting its interior.
    TopLevel { child: NodeId, material: Material },
}
