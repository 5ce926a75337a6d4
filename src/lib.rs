#![doc = include_str!("../README.md")]
#![cfg_attr(not(debug_assertions), warn(missing_docs))]
#![warn(unreachable_pub)]

pub mod csg;
mod mesh;
mod morton;
pub mod spatial;
mod tree;
mod voxel;

use nalgebra::Point3;

pub use mesh::*;
pub use morton::*;
pub use tree::*;
pub use voxel::*;

/// Integer coordinates of a voxel's minimum corner within the octree grid.
///
/// Components range over `0..=Voxel::MAX_COORDINATE`.
pub type GridPoint = Point3<u16>;
