//! The packed voxel word and its navigation operations.

use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::morton;
use crate::GridPoint;

/// Material identifier carried in a voxel's low bits.
pub type Material = u32;

/// Sentinel material meaning "undecided": the octree builder subdivides a
/// voxel as long as its predicate keeps returning this.
pub const UNKNOWN: Material = 0;

/// Material of empty space. Voxels of this material survive construction but
/// are dropped by the mesh emitter.
pub const VOID: Material = 1;

const fn mask(bits: u32) -> u64 {
    if bits == 0 {
        0
    } else {
        u64::MAX >> (64 - bits)
    }
}

/// A single octree cell, packed into one 64-bit word.
///
/// Bit layout, most significant first: the Morton location code of the
/// cell's minimum corner, the refinement level, and the material id. Because
/// the location occupies the high bits, the numeric order of the word is
/// first Morton order (a spatial pre-order traversal), then level, then
/// material.
///
/// The layout is fixed by explicit shifts and masks, not bitfields, so the
/// compiler cannot reorder the fields.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Voxel {
    code: u64,
}

/// The three fields must exactly fill the packed word.
const _: () = assert!(Voxel::LOCATION_BITS + Voxel::LEVEL_BITS + Voxel::MATERIAL_BITS == 64);

impl Voxel {
    /// Bits of coordinate precision per axis.
    pub const PRECISION: u32 = 13;
    /// Width of the Morton location code.
    pub const LOCATION_BITS: u32 = Self::PRECISION * 3;
    /// Width of the level field: enough for levels `0..=PRECISION`.
    pub const LEVEL_BITS: u32 = u32::BITS - Self::PRECISION.leading_zeros();
    /// Whatever is left goes to the material id.
    pub const MATERIAL_BITS: u32 = 64 - Self::LOCATION_BITS - Self::LEVEL_BITS;

    /// Largest coordinate component: `2^PRECISION - 1`.
    pub const MAX_COORDINATE: u16 = (1 << Self::PRECISION) - 1;
    /// The finest level. Level counts subdivisions from the root: level 0 is
    /// the whole space, level `MAX_LEVEL` a unit cube.
    pub const MAX_LEVEL: u8 = Self::PRECISION as u8;
    /// Largest representable material id.
    pub const MAX_MATERIAL: Material = ((1u64 << Self::MATERIAL_BITS) - 1) as Material;

    /// Pack a voxel from unpacked coordinates.
    ///
    /// # Panics
    ///
    /// * any coordinate component > [MAX_COORDINATE](Self::MAX_COORDINATE)
    /// * `level` > [MAX_LEVEL](Self::MAX_LEVEL)
    /// * `material` > [MAX_MATERIAL](Self::MAX_MATERIAL)
    pub fn new(coordinates: GridPoint, level: u8, material: Material) -> Self {
        assert!(coordinates.x <= Self::MAX_COORDINATE, "x coordinate out of range");
        assert!(coordinates.y <= Self::MAX_COORDINATE, "y coordinate out of range");
        assert!(coordinates.z <= Self::MAX_COORDINATE, "z coordinate out of range");

        let location = morton::morton(Point3::new(
            u32::from(coordinates.x),
            u32::from(coordinates.y),
            u32::from(coordinates.z),
        ));
        Self::from_parts(location, level, material)
    }

    /// Pack a voxel from an already-encoded location code.
    ///
    /// # Panics
    ///
    /// * `level` > [MAX_LEVEL](Self::MAX_LEVEL)
    /// * `material` > [MAX_MATERIAL](Self::MAX_MATERIAL)
    pub fn from_parts(location: u64, level: u8, material: Material) -> Self {
        assert!(level <= Self::MAX_LEVEL, "voxel level out of range");
        assert!(material <= Self::MAX_MATERIAL, "material id out of range");
        debug_assert!(location <= mask(Self::LOCATION_BITS));

        Self {
            code: location << (Self::MATERIAL_BITS + Self::LEVEL_BITS)
                | u64::from(level) << Self::MATERIAL_BITS
                | u64::from(material),
        }
    }

    /// Reconstruct a voxel from its packed word. Trusted: no validation.
    #[inline]
    pub fn from_code(code: u64) -> Self {
        Self { code }
    }

    /// The whole packed word. Voxels compare by this value.
    #[inline]
    pub fn code(self) -> u64 {
        self.code
    }

    /// Refinement level: 0 is the whole space,
    /// [MAX_LEVEL](Self::MAX_LEVEL) a unit cube.
    ///
    /// Because the packed word holds the location above the level, an
    /// ancestor sorts immediately before every descendant sharing its
    /// location code; code order is pre-order.
    #[inline]
    pub fn level(self) -> u8 {
        ((self.code >> Self::MATERIAL_BITS) & mask(Self::LEVEL_BITS)) as u8
    }

    /// The material id.
    #[inline]
    pub fn material(self) -> Material {
        (self.code & mask(Self::MATERIAL_BITS)) as Material
    }

    /// The Morton location code of the minimum corner.
    #[inline]
    pub fn morton(self) -> u64 {
        (self.code >> (Self::MATERIAL_BITS + Self::LEVEL_BITS)) & mask(Self::LOCATION_BITS)
    }

    /// Decoded minimum-corner (left/bottom/back) coordinates.
    pub fn coordinates(self) -> GridPoint {
        let p = morton::unmorton(self.morton());
        GridPoint::new(p.x as u16, p.y as u16, p.z as u16)
    }

    /// Levels of subdivision left before the unit cube:
    /// `MAX_LEVEL - level()`.
    #[inline]
    pub fn height(self) -> u8 {
        Self::MAX_LEVEL - self.level()
    }

    /// Edge length in grid units: `1 << height()`. The root spans the whole
    /// grid, a voxel at [MAX_LEVEL](Self::MAX_LEVEL) a single unit.
    #[inline]
    pub fn size(self) -> u16 {
        1 << self.height()
    }

    /// The same voxel with another material.
    #[inline]
    #[must_use]
    pub fn with_material(self, material: Material) -> Self {
        Self::from_parts(self.morton(), self.level(), material)
    }

    /// The same voxel at another level.
    #[inline]
    #[must_use]
    pub fn with_level(self, level: u8) -> Self {
        Self::from_parts(self.morton(), level, self.material())
    }

    /// The same voxel at another location.
    #[inline]
    #[must_use]
    pub fn with_morton(self, location: u64) -> Self {
        Self::from_parts(location, self.level(), self.material())
    }

    /// The root voxel: the whole space, still undecided.
    pub fn root() -> Self {
        Self::new(GridPoint::new(0, 0, 0), 0, UNKNOWN)
    }

    /// The eight children, in Morton order, inheriting the parent's material.
    ///
    /// In a well-formed location code the three don't-care bits at the
    /// children's octal digit are zero, so enumerating the octants is a
    /// matter of repeatedly incrementing that digit; the first child shares
    /// the parent's location code and only differs in level.
    ///
    /// # Panics
    ///
    /// Panics on a height-zero voxel: a unit cube has no children.
    pub fn children(self) -> [Voxel; 8] {
        assert!(self.height() > 0, "can't subdivide a unit voxel");

        let level = self.level() + 1;
        let inc = 1u64 << (u32::from(self.height() - 1) * 3);

        let mut location = self.morton();
        std::array::from_fn(|_| {
            let child = Self::from_parts(location, level, self.material());
            location += inc;
            child
        })
    }

    /// The eight corner points of the cell, in Morton corner order
    /// (x is bit 0, y bit 1, z bit 2 of the corner index).
    pub fn corners(self) -> [GridPoint; 8] {
        let origin = self.coordinates();
        let size = self.size();
        std::array::from_fn(|i| {
            let i = i as u16;
            GridPoint::new(
                origin.x + (i & 1) * size,
                origin.y + ((i >> 1) & 1) * size,
                origin.z + ((i >> 2) & 1) * size,
            )
        })
    }

    /// The same-size cell adjacent across `face`, or `None` at the edge of
    /// the grid.
    ///
    /// Toward a positive face the minimum corner moves by a whole edge
    /// length; toward a negative face it moves by a single unit. One unit is
    /// enough because the coordinate stored is the minimum corner, so any
    /// point past it belongs to the neighbor no matter how coarse or fine
    /// that neighbor really is. The result is a search key, not necessarily
    /// a stored voxel.
    pub fn neighbor(self, face: Face) -> Option<Voxel> {
        let mut coordinates = self.coordinates();
        let c = &mut coordinates[face.axis()];

        if face.is_positive() {
            let moved = *c + self.size();
            if moved > Self::MAX_COORDINATE {
                return None;
            }
            *c = moved;
        } else {
            *c = c.checked_sub(1)?;
        }

        Some(Self::new(coordinates, self.level(), self.material()))
    }
}

impl fmt::Debug for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.coordinates();
        write!(
            f,
            "Voxel({}, {}, {}; level {}, material {})",
            c.x,
            c.y,
            c.z,
            self.level(),
            self.material()
        )
    }
}

/// The six faces of a voxel cell, named from the grid's point of view:
/// left/right along x, bottom/top along y, back/front along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Back = 4,
    Front = 5,
}

impl Face {
    /// Iterator through all faces, in declaration (normal-table) order.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Left,
            Self::Right,
            Self::Bottom,
            Self::Top,
            Self::Back,
            Self::Front,
        ]
        .into_iter()
    }

    /// The axis the face is orthogonal to: 0, 1 or 2 for x, y, z.
    #[inline]
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// Whether the face looks toward the positive end of its axis.
    #[inline]
    pub fn is_positive(self) -> bool {
        self as usize % 2 == 1
    }

    /// The face on the opposite side of the cell.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::Back => Self::Front,
            Self::Front => Self::Back,
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vector3<i32> {
        let sign = if self.is_positive() { 1 } else { -1 };
        let mut n = Vector3::zeros();
        n[self.axis()] = sign;
        n
    }
}

/// Corner indices of a voxel cell, in Morton corner order: x is bit 0, y is
/// bit 1, z is bit 2. Matches the child order of [Voxel::children] and the
/// vertex order of [Voxel::corners].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Corner {
    LeftBottomBack = 0,
    RightBottomBack = 1,
    LeftTopBack = 2,
    RightTopBack = 3,
    LeftBottomFront = 4,
    RightBottomFront = 5,
    LeftTopFront = 6,
    RightTopFront = 7,
}
