//! The linear octree: a flat, code-sorted sequence of voxels.
//!
//! Inner nodes are implicit. Morton order encodes a pre-order traversal of
//! the tree, so sorting the voxels by their packed word *is* the tree, and
//! ancestry and adjacency questions reduce to binary searches.

mod build;

pub use build::*;

use nalgebra::Matrix4;

use crate::spatial::Real;
use crate::voxel::{Face, Voxel};

/// A sparse voxel octree over the integer grid, plus the affine transform
/// mapping grid coordinates into the world space it was built against.
#[derive(Debug, Clone)]
pub struct Octree {
    voxels: Vec<Voxel>,
    transform: Matrix4<Real>,
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    /// An empty octree with an identity world transform.
    pub fn new() -> Self {
        Self {
            voxels: Vec::new(),
            transform: Matrix4::identity(),
        }
    }

    /// The voxels in their natural (code-sorted) order.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Grid-to-world transform. Identity unless set, or computed by
    /// [build_csg](Self::build_csg) from the scene's bounding cube.
    pub fn transform(&self) -> &Matrix4<Real> {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix4<Real>) {
        self.transform = transform;
    }

    /// Position of the first voxel whose code is not less than `key`'s.
    fn lower_bound(&self, key: Voxel) -> usize {
        self.voxels.partition_point(|v| v.code() < key.code())
    }

    /// Locate the face neighbor of a stored voxel.
    ///
    /// The same-size neighbor key from [Voxel::neighbor] is looked up by
    /// lower bound, which lands exactly at the seam between the three
    /// possible outcomes: the slot holds the key itself (an equal-size
    /// neighbor), or the first of the key's descendants (finer neighbors
    /// start there and run upward); when the actual neighbor is coarser,
    /// the covering ancestor sits one slot before, recognizable by its
    /// Morton prefix. Returns `None` when `voxel` touches the grid boundary
    /// across `face`.
    pub fn neighbor(&self, voxel: Voxel, face: Face) -> Option<usize> {
        let key = voxel.neighbor(face)?;
        Some(self.lower_bound(key))
    }

    /// Locate an edge neighbor: the face-`second` neighbor of the
    /// face-`first` key.
    pub fn edge_neighbor(&self, voxel: Voxel, first: Face, second: Face) -> Option<usize> {
        let key = voxel.neighbor(first)?.neighbor(second)?;
        Some(self.lower_bound(key))
    }
}

impl<'tree> IntoIterator for &'tree Octree {
    type Item = &'tree Voxel;
    type IntoIter = std::slice::Iter<'tree, Voxel>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.iter()
    }
}
