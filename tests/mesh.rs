use nalgebra::Matrix4;
use ocmesh::{write_obj, GridPoint, Octree, UNKNOWN, VOID};

fn obj_lines(octree: &Octree) -> Vec<String> {
    let mut buffer = Vec::new();
    write_obj(octree, &mut buffer).unwrap();
    String::from_utf8(buffer)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// One cube per non-void voxel: eight vertices and twelve triangles, plus
/// the six shared normals at the top of the file.
#[test]
fn counts_per_voxel() {
    let mut octree = Octree::new();
    // one level of subdivision; a single solid octant
    octree.build(|v| {
        if v.level() == 0 {
            UNKNOWN
        } else if v.coordinates() == GridPoint::new(0, 0, 0) {
            2
        } else {
            VOID
        }
    });
    assert_eq!(octree.len(), 8);

    let lines = obj_lines(&octree);
    assert_eq!(lines.iter().filter(|l| l.starts_with("vn ")).count(), 6);
    assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 8);
    assert_eq!(lines.iter().filter(|l| l.starts_with("f ")).count(), 12);

    // normals first, in left/right/bottom/top/back/front order
    assert_eq!(lines[0], "vn -1 0 0");
    assert_eq!(lines[1], "vn 1 0 0");
    assert_eq!(lines[2], "vn 0 -1 0");
    assert_eq!(lines[3], "vn 0 1 0");
    assert_eq!(lines[4], "vn 0 0 -1");
    assert_eq!(lines[5], "vn 0 0 1");
}

#[test]
fn counts_scale_with_solid_voxels() {
    let mut octree = Octree::new();
    // two levels; everything below the halfway plane is solid
    octree.build(|v| {
        if v.level() < 2 {
            UNKNOWN
        } else if v.coordinates().y < 4096 {
            2
        } else {
            VOID
        }
    });
    let solid = octree
        .voxels()
        .iter()
        .filter(|v| v.material() != VOID)
        .count();
    assert_eq!(octree.len(), 64);
    assert_eq!(solid, 32);

    let lines = obj_lines(&octree);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("v ")).count(),
        8 * solid
    );
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("f ")).count(),
        12 * solid
    );
}

/// Face lines reference vertices 1-based and normals 1..=6, and every
/// vertex index is in range.
#[test]
fn face_indices_are_valid() {
    let mut octree = Octree::new();
    octree.build(|v| {
        if v.level() == 0 {
            UNKNOWN
        } else if v.coordinates().x == 0 {
            2
        } else {
            VOID
        }
    });

    let lines = obj_lines(&octree);
    let vertices = lines.iter().filter(|l| l.starts_with("v ")).count();

    for line in lines.iter().filter(|l| l.starts_with("f ")) {
        let refs: Vec<_> = line[2..].split_whitespace().collect();
        assert_eq!(refs.len(), 3, "triangles only: {line}");
        for r in refs {
            let (v, n) = r.split_once("//").expect("v//n references");
            let v: usize = v.parse().unwrap();
            let n: usize = n.parse().unwrap();
            assert!((1..=vertices).contains(&v), "vertex out of range: {line}");
            assert!((1..=6).contains(&n), "normal out of range: {line}");
        }
    }
}

/// With the identity transform the corner coordinates pass through
/// untouched.
#[test]
fn identity_transform_keeps_grid_coordinates() {
    let mut octree = Octree::new();
    octree.build(|v| if v.level() == 0 { UNKNOWN } else { 2 });

    let lines = obj_lines(&octree);
    // the first cube is the origin octant of size 4096
    assert_eq!(lines[6], "v 0 0 0");
    assert_eq!(lines[7], "v 4096 0 0");
    assert_eq!(lines[8], "v 0 4096 0");
}

/// The octree's world transform maps every emitted vertex.
#[test]
fn world_transform_is_applied() {
    let mut octree = Octree::new();
    octree.build(|v| if v.level() == 0 { UNKNOWN } else { 2 });
    octree.set_transform(Matrix4::new_scaling(0.5));

    let lines = obj_lines(&octree);
    assert_eq!(lines[7], "v 2048 0 0");
}
