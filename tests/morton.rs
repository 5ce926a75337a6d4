use nalgebra::Point3;
use ocmesh::{deinterleave, interleave, morton, unmorton, Coordinate};
use rand::Rng;

/// Hand-checked interleave results: bit `k` of the value lands on bit
/// `3k + coordinate`.
#[test]
fn interleave_spreads_bits() {
    assert_eq!(interleave(0b1, Coordinate::X), 0b1);
    assert_eq!(interleave(0b1, Coordinate::Y), 0b10);
    assert_eq!(interleave(0b1, Coordinate::Z), 0b100);

    assert_eq!(interleave(0b11, Coordinate::X), 0b001_001);
    assert_eq!(interleave(0b11, Coordinate::Y), 0b010_010);
    assert_eq!(interleave(0b11, Coordinate::Z), 0b100_100);

    // the full 21-bit range spreads into 63 bits
    let all = (1 << 21) - 1;
    assert_eq!(interleave(all, Coordinate::X), 0x1249_2492_4924_9249);
}

/// A Morton code is the union of its three interleaved lanes.
#[test]
fn morton_is_component_independent() {
    let mut rng = rand::rng();
    for _ in 0..1000 {
        let p = Point3::new(
            rng.random_range(0..1u32 << 21),
            rng.random_range(0..1u32 << 21),
            rng.random_range(0..1u32 << 21),
        );
        assert_eq!(
            morton(p),
            interleave(p.x, Coordinate::X)
                | interleave(p.y, Coordinate::Y)
                | interleave(p.z, Coordinate::Z)
        );
    }
}

#[test]
fn morton_known_values() {
    assert_eq!(morton(Point3::new(0, 0, 0)), 0);
    assert_eq!(morton(Point3::new(1, 0, 0)), 1);
    assert_eq!(morton(Point3::new(0, 1, 0)), 2);
    assert_eq!(morton(Point3::new(0, 0, 1)), 4);
    assert_eq!(morton(Point3::new(1, 1, 1)), 7);
    // x = 1, y = 2, z = 4: bits land on positions 0, 4 and 8
    assert_eq!(morton(Point3::new(1, 2, 4)), 0b1_0001_0001);
}

/// Round-trip through the codec for edge patterns and random points.
#[test]
fn morton_round_trip() {
    let edges = [0u32, 1, 2, 0b101010, 0x0FFF, 1 << 20, (1 << 21) - 1];
    for &x in &edges {
        for &y in &edges {
            for &z in &edges {
                let p = Point3::new(x, y, z);
                assert_eq!(unmorton(morton(p)), p);
            }
        }
    }

    let mut rng = rand::rng();
    for _ in 0..1000 {
        let p = Point3::new(
            rng.random_range(0..1u32 << 21),
            rng.random_range(0..1u32 << 21),
            rng.random_range(0..1u32 << 21),
        );
        assert_eq!(unmorton(morton(p)), p);
    }
}

#[test]
fn deinterleave_selects_lane() {
    let code = morton(Point3::new(12345, 54321, 1 << 20));
    assert_eq!(deinterleave(code, Coordinate::X), 12345);
    assert_eq!(deinterleave(code, Coordinate::Y), 54321);
    assert_eq!(deinterleave(code, Coordinate::Z), 1 << 20);
}
