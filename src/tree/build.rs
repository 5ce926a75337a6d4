//! Adaptive construction of the linear octree.

use nalgebra::Matrix4;
use tracing::debug;

use super::Octree;
use crate::csg::{NodeId, Scene};
use crate::spatial::{AACube, Real, WorldVector};
use crate::voxel::{Material, Voxel, UNKNOWN, VOID};

/// How a voxel relates to a solid's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    /// Entirely inside the solid.
    Inside,
    /// Entirely outside the solid.
    Outside,
    /// The voxel's bounding sphere crosses the surface: subdivide.
    Boundary,
}

impl Octree {
    /// Populate the octree by adaptive subdivision.
    ///
    /// The predicate assigns a material to each voxel it is shown, or
    /// [UNKNOWN] to request subdivision. Expansion happens in a single
    /// buffer: at the scan index, an undecided voxel is replaced by its
    /// first child (so the same slot is examined again) while the other
    /// seven children are appended at the tail; a decided voxel is stamped
    /// with its material and the scan advances. A final sort by code turns
    /// the expansion order into the canonical Morton order.
    ///
    /// A unit voxel the predicate still leaves undecided is assigned
    /// [VOID].
    ///
    /// Afterwards the sequence is strictly ascending by code, contains no
    /// [UNKNOWN] material, and tiles the whole grid. The predicate must
    /// judge a voxel on its own: it is not allowed to observe the octree,
    /// which is mid-rebuild while this runs.
    #[tracing::instrument(skip_all)]
    pub fn build<F>(&mut self, mut predicate: F)
    where
        F: FnMut(Voxel) -> Material,
    {
        self.voxels.clear();
        self.voxels.push(Voxel::root());

        let mut i = 0;
        while i < self.voxels.len() {
            let voxel = self.voxels[i];
            let material = predicate(voxel);

            if material == UNKNOWN && voxel.height() > 0 {
                let children = voxel.children();
                self.voxels[i] = children[0];
                self.voxels.extend_from_slice(&children[1..]);
            } else if material == UNKNOWN {
                // fully subdivided and still undecided
                self.voxels[i] = voxel.with_material(VOID);
                i += 1;
            } else {
                self.voxels[i] = voxel.with_material(material);
                i += 1;
            }
        }

        self.voxels.sort_unstable();
        debug!(voxels = self.voxels.len(), "octree built");

        debug_assert!(self.voxels.windows(2).all(|w| w[0].code() < w[1].code()));
        debug_assert!(self.voxels.iter().all(|v| v.material() != UNKNOWN));
    }

    /// Build the octree from a CSG scene.
    ///
    /// The scene's bounding cube becomes the octree's world volume (the
    /// grid-to-world transform is stored on the octree), and each voxel is
    /// classified against the top-level solids in declaration order: the
    /// first solid that fully contains it decides the material, the first
    /// one whose surface crosses it forces subdivision, and a voxel
    /// belonging to no solid is [VOID].
    ///
    /// `epsilon` is the relative precision: subdivision stops once a voxel's
    /// world-space side falls below `epsilon` times the bounding cube side.
    ///
    /// # Panics
    ///
    /// Panics when `epsilon` is outside `(0, 1]` or the scene has no
    /// top-levels.
    #[tracing::instrument(skip(self, scene))]
    pub fn build_csg(&mut self, scene: &Scene, epsilon: Real) {
        assert!(
            epsilon > 0.0 && epsilon <= 1.0,
            "relative precision out of (0, 1]"
        );

        let bounds = scene.bounding_box();
        let scale = bounds.length / Real::from(Voxel::MAX_COORDINATE);
        self.transform = Matrix4::new_translation(&bounds.origin.coords)
            * Matrix4::new_scaling(scale);

        self.build(|voxel| {
            for (object, material) in scene.toplevels() {
                match intersection(scene, object, &bounds, epsilon, voxel) {
                    Intersection::Inside => return material,
                    Intersection::Boundary => return UNKNOWN,
                    Intersection::Outside => {}
                }
            }
            VOID
        });
    }
}

/// Classify a voxel against one solid with the sphere-bound test.
///
/// The voxel is mapped into world space through the scene bounding cube; its
/// circumscribed sphere can cross the surface only when the distance at its
/// center is smaller in magnitude than the sphere's radius (half the cube
/// diagonal). The `epsilon` floor keeps that answer from requesting
/// subdivision below the target resolution.
pub fn intersection(
    scene: &Scene,
    object: NodeId,
    bounds: &AACube,
    epsilon: Real,
    voxel: Voxel,
) -> Intersection {
    let scale = bounds.length / Real::from(Voxel::MAX_COORDINATE);
    let coordinates = voxel.coordinates();

    let side = scale * Real::from(voxel.size());
    let origin = bounds.origin
        + WorldVector::new(
            Real::from(coordinates.x),
            Real::from(coordinates.y),
            Real::from(coordinates.z),
        ) * scale;
    let center = origin + WorldVector::repeat(side / 2.0);
    let diagonal = side * Real::sqrt(3.0);

    let d = scene.distance(object, center);
    if d.abs() < diagonal / 2.0 && side >= epsilon * bounds.length {
        Intersection::Boundary
    } else if d > 0.0 {
        Intersection::Outside
    } else {
        Intersection::Inside
    }
}
