//! Morton (Z-order) encoding of 3D grid coordinates.
//!
//! Voxels in a linear octree are stored in an order equivalent to a pre-order
//! traversal of the tree, which spatially corresponds to the space-filling
//! path known as Z-order or, recursively, Morton order. The Morton code of a
//! coordinate vector is obtained by interleaving the bits of its components:
//! for `x = xxxx`, `y = yyyy`, `z = zzzz` the code reads `zyxzyxzyxzyx`.
//!
//! A 64-bit word fits 21 bits per component. [Voxel](crate::Voxel) uses a
//! smaller coordinate width for its own reasons, but the codec here is
//! independent of that choice and packs all 21 bits.

use nalgebra::Point3;

/// The interleave lane of each coordinate axis within a Morton code.
///
/// The relative order of the axes is arbitrary, but it decides the spatial
/// order octree traversals follow, so it is hardcoded once and for all here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Coordinate {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Spread the low 21 bits of `value` three positions apart, into the lane of
/// the given coordinate: bit `k` of `value` moves to bit `3k + coord`.
///
/// Five constant-time shift-and-mask stages; to see the magic, apply the
/// masks by hand for a couple of rounds.
#[inline]
pub fn interleave(value: u32, coord: Coordinate) -> u64 {
    let mut x = u64::from(value);

    x = (x | (x << 32)) & 0xFFFF_0000_0000_FFFF;
    x = (x | (x << 16)) & 0x00FF_0000_FF00_00FF;
    x = (x | (x << 8)) & 0xF00F_00F0_0F00_F00F;
    x = (x | (x << 4)) & 0x30C3_0C30_C30C_30C3;
    x = (x | (x << 2)) & 0x9249_2492_4924_9249;

    x << coord as u8
}

/// Collapse one coordinate lane of a Morton code back into a plain integer.
/// Inverse of [interleave].
#[inline]
pub fn deinterleave(code: u64, coord: Coordinate) -> u32 {
    let mut x = code >> coord as u8;

    x &= 0x9249_2492_4924_9249;
    x = (x | (x >> 2)) & 0x30C3_0C30_C30C_30C3;
    x = (x | (x >> 4)) & 0xF00F_00F0_0F00_F00F;
    x = (x | (x >> 8)) & 0x00FF_0000_FF00_00FF;
    x = (x | (x >> 16)) & 0xFFFF_0000_0000_FFFF;
    x = (x | (x >> 32)) & 0x0000_0000_FFFF_FFFF;

    // the result surely fits into 32 bits
    x as u32
}

/// Interleave all three components of a grid point into a single code.
#[inline]
pub fn morton(coordinates: Point3<u32>) -> u64 {
    interleave(coordinates.x, Coordinate::X)
        | interleave(coordinates.y, Coordinate::Y)
        | interleave(coordinates.z, Coordinate::Z)
}

/// Unpack a Morton code into its three coordinates. Inverse of [morton].
#[inline]
pub fn unmorton(code: u64) -> Point3<u32> {
    Point3::new(
        deinterleave(code, Coordinate::X),
        deinterleave(code, Coordinate::Y),
        deinterleave(code, Coordinate::Z),
    )
}
