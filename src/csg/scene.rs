use std::fmt;
use std::ops::Index;

use nalgebra::{Matrix4, Rotation3, Unit, Vector3, Vector4};

use super::{Node, NodeId};
use crate::spatial::{AACube, Real, WorldPoint};
use crate::voxel::Material;

/// Owner of a CSG node arena and the ordered list of top-level solids.
///
/// Nodes are created through the factory methods and never mutated; the arena
/// grows monotonically and every [NodeId] stays valid until the scene is
/// dropped.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    toplevels: Vec<NodeId>,
}

impl Index<NodeId> for Scene {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// A sphere of the given radius, centered at the origin.
    pub fn sphere(&mut self, radius: Real) -> NodeId {
        assert!(radius > 0.0, "sphere radius must be positive");
        self.intern(Node::Sphere { radius })
    }

    /// An axis-aligned cube of the given side, centered at the origin.
    pub fn cube(&mut self, side: Real) -> NodeId {
        assert!(side > 0.0, "cube side must be positive");
        self.intern(Node::Cube { side })
    }

    /// Points belonging to either operand.
    pub fn unite(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.intern(Node::Union { left, right })
    }

    /// Points belonging to both operands.
    pub fn intersect(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.intern(Node::Intersection { left, right })
    }

    /// Points of `left` with `right` carved out.
    pub fn subtract(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.intern(Node::Difference { left, right })
    }

    /// Place `child` under an affine change of coordinates.
    ///
    /// The inverse is computed here, once, and reused by every distance
    /// query.
    ///
    /// # Panics
    ///
    /// Panics when `object_to_world` is not invertible (a zero scale factor,
    /// for instance).
    pub fn transform(&mut self, child: NodeId, object_to_world: Matrix4<Real>) -> NodeId {
        let world_to_object = object_to_world
            .try_inverse()
            .expect("CSG transform must be invertible");
        self.intern(Node::Transform {
            child,
            object_to_world,
            world_to_object,
        })
    }

    /// Componentwise scaling.
    pub fn scale(&mut self, factors: Vector3<Real>, child: NodeId) -> NodeId {
        assert!(
            factors.iter().all(|f| *f != 0.0),
            "zero scale factor in CSG transform"
        );
        self.transform(child, Matrix4::new_nonuniform_scaling(&factors))
    }

    pub fn xscale(&mut self, factor: Real, child: NodeId) -> NodeId {
        self.scale(Vector3::new(factor, 1.0, 1.0), child)
    }

    pub fn yscale(&mut self, factor: Real, child: NodeId) -> NodeId {
        self.scale(Vector3::new(1.0, factor, 1.0), child)
    }

    pub fn zscale(&mut self, factor: Real, child: NodeId) -> NodeId {
        self.scale(Vector3::new(1.0, 1.0, factor), child)
    }

    /// Rotation of `angle` radians around `axis`, right-hand rule.
    pub fn rotate(&mut self, angle: Real, axis: Vector3<Real>, child: NodeId) -> NodeId {
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle);
        self.transform(child, rotation.to_homogeneous())
    }

    pub fn xrotate(&mut self, angle: Real, child: NodeId) -> NodeId {
        self.rotate(angle, Vector3::x(), child)
    }

    pub fn yrotate(&mut self, angle: Real, child: NodeId) -> NodeId {
        self.rotate(angle, Vector3::y(), child)
    }

    pub fn zrotate(&mut self, angle: Real, child: NodeId) -> NodeId {
        self.rotate(angle, Vector3::z(), child)
    }

    pub fn translate(&mut self, offset: Vector3<Real>, child: NodeId) -> NodeId {
        self.transform(child, Matrix4::new_translation(&offset))
    }

    pub fn xtranslate(&mut self, offset: Real, child: NodeId) -> NodeId {
        self.translate(Vector3::new(offset, 0.0, 0.0), child)
    }

    pub fn ytranslate(&mut self, offset: Real, child: NodeId) -> NodeId {
        self.translate(Vector3::new(0.0, offset, 0.0), child)
    }

    pub fn ztranslate(&mut self, offset: Real, child: NodeId) -> NodeId {
        self.translate(Vector3::new(0.0, 0.0, offset), child)
    }

    /// Mark `child` for building, its interior painted with `material`.
    pub fn toplevel(&mut self, child: NodeId, material: Material) -> NodeId {
        let id = self.intern(Node::TopLevel { child, material });
        self.toplevels.push(id);
        id
    }

    /// The top-level solids with their materials, in declaration order.
    /// Solids declared earlier paint over later ones where they overlap.
    pub fn toplevels(&self) -> impl Iterator<Item = (NodeId, Material)> + '_ {
        self.toplevels.iter().map(|&id| match self[id] {
            Node::TopLevel { material, .. } => (id, material),
            _ => unreachable!("toplevel list holds only TopLevel nodes"),
        })
    }

    /// Signed distance from `point` to the surface of `node`'s solid:
    /// negative inside, positive outside, magnitude a conservative bound on
    /// the distance to the surface.
    pub fn distance(&self, node: NodeId, point: WorldPoint) -> Real {
        match self[node] {
            Node::Sphere { radius } => point.coords.norm() - radius,
            Node::Cube { side } => {
                point.x.abs().max(point.y.abs()).max(point.z.abs()) - side / 2.0
            }
            Node::Union { left, right } => {
                self.distance(left, point).min(self.distance(right, point))
            }
            Node::Intersection { left, right } => {
                self.distance(left, point).max(self.distance(right, point))
            }
            Node::Difference { left, right } => {
                self.distance(left, point).max(-self.distance(right, point))
            }
            Node::Transform {
                child,
                world_to_object,
                ..
            } => {
                let p = world_to_object * Vector4::new(point.x, point.y, point.z, 1.0);
                self.distance(child, WorldPoint::new(p.x, p.y, p.z))
            }
            Node::TopLevel { child, .. } => self.distance(child, point),
        }
    }

    /// Conservative axis-aligned bounding cube of `node`'s solid.
    ///
    /// Conservative means the solid is contained in the cube, not that the
    /// cube is tight: intersections reuse the union bound, differences the
    /// left operand's.
    pub fn bounding_box_of(&self, node: NodeId) -> AACube {
        match self[node] {
            Node::Sphere { radius } => AACube::centered(radius * 2.0),
            Node::Cube { side } => AACube::centered(side),
            Node::Union { left, right } | Node::Intersection { left, right } => self
                .bounding_box_of(left)
                .union(&self.bounding_box_of(right)),
            Node::Difference { left, .. } => self.bounding_box_of(left),
            Node::Transform {
                child,
                object_to_world,
                ..
            } => self.bounding_box_of(child).transformed(&object_to_world),
            Node::TopLevel { child, .. } => self.bounding_box_of(child),
        }
    }

    /// Union bounding cube of all top-level solids: the space an octree
    /// built from this scene must cover.
    ///
    /// # Panics
    ///
    /// Panics on a scene with no top-levels; there is nothing to build.
    pub fn bounding_box(&self) -> AACube {
        let mut toplevels = self.toplevels();
        let (first, _) = toplevels
            .next()
            .expect("bounding box of a scene with no toplevels");
        toplevels.fold(self.bounding_box_of(first), |bb, (id, _)| {
            bb.union(&self.bounding_box_of(id))
        })
    }

    /// Render `node` in the scene language, for logs and debugging.
    /// Transforms print a placeholder, their matrices having no textual
    /// form.
    pub fn display(&self, node: NodeId) -> impl fmt::Display + '_ {
        DisplayNode { scene: self, node }
    }
}

struct DisplayNode<'scene> {
    scene: &'scene Scene,
    node: NodeId,
}

impl fmt::Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let child = |node| DisplayNode {
            scene: self.scene,
            node,
        };
        match self.scene[self.node] {
            Node::Sphere { radius } => write!(f, "sphere({radius})"),
            Node::Cube { side } => write!(f, "cube({side})"),
            Node::Union { left, right } => {
                write!(f, "unite({}, {})", child(left), child(right))
            }
            Node::Intersection { left, right } => {
                write!(f, "intersect({}, {})", child(left), child(right))
            }
            Node::Difference { left, right } => {
                write!(f, "subtract({}, {})", child(left), child(right))
            }
            Node::Transform { child: c, .. } => write!(f, "transform(matrix.., {})", child(c)),
            Node::TopLevel { child: c, material } => {
                write!(f, "build {material} {}", child(c))
            }
        }
    }
}
