use std::f32::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};
use ocmesh::csg::Scene;
use ocmesh::spatial::AACube;

#[test]
fn sphere_distance() {
    let mut scene = Scene::new();
    let sphere = scene.sphere(42.0);

    assert_eq!(scene.distance(sphere, Point3::new(0.0, 0.0, 0.0)), -42.0);
    assert_eq!(scene.distance(sphere, Point3::new(43.0, 0.0, 0.0)), 1.0);
}

#[test]
fn cube_distance() {
    let mut scene = Scene::new();
    let cube = scene.cube(42.0);

    assert_eq!(scene.distance(cube, Point3::new(0.0, 0.0, 0.0)), -21.0);
    assert_eq!(scene.distance(cube, Point3::new(21.0, 21.0, 21.0)), 0.0);
    assert_eq!(scene.distance(cube, Point3::new(22.0, 21.0, 21.0)), 1.0);
}

#[test]
fn union_takes_the_nearer_solid() {
    let mut scene = Scene::new();
    let a = scene.sphere(10.0);
    let moved = scene.sphere(10.0);
    let b = scene.xtranslate(15.0, moved);
    let both = scene.unite(a, b);

    assert_eq!(scene.distance(both, Point3::new(0.0, 0.0, 0.0)), -10.0);
    assert_eq!(scene.distance(both, Point3::new(15.0, 0.0, 0.0)), -10.0);
    // between the two centers, inside both
    assert_eq!(scene.distance(both, Point3::new(7.5, 0.0, 0.0)), -2.5);
}

#[test]
fn intersection_keeps_the_overlap() {
    let mut scene = Scene::new();
    let a = scene.sphere(10.0);
    let moved = scene.sphere(10.0);
    let b = scene.xtranslate(15.0, moved);
    let lens = scene.intersect(a, b);

    // the center of `a` is outside `b`, so outside the intersection
    assert_eq!(scene.distance(lens, Point3::new(0.0, 0.0, 0.0)), 5.0);
    // the overlap midpoint is inside both
    assert_eq!(scene.distance(lens, Point3::new(7.5, 0.0, 0.0)), -2.5);
}

/// `subtract(a, b)` carves `b` out of `a`: inside means inside `a` and
/// outside `b`. Reference points chosen so the expected distances are exact.
#[test]
fn difference_carves_the_right_operand() {
    let mut scene = Scene::new();
    let a = scene.sphere(10.0);
    let moved = scene.sphere(10.0);
    let b = scene.xtranslate(15.0, moved);
    let carved = scene.subtract(a, b);

    // deep in `a`, far from `b`
    assert_eq!(scene.distance(carved, Point3::new(-8.0, 0.0, 0.0)), -2.0);
    // inside both: carved away, distance governed by `b`'s boundary
    assert_eq!(scene.distance(carved, Point3::new(8.0, 0.0, 0.0)), 3.0);
    // outside `a` entirely (and still inside `b`, which dominates the bound)
    assert_eq!(scene.distance(carved, Point3::new(11.0, 0.0, 0.0)), 6.0);
}

#[test]
fn translation_moves_the_solid() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let moved = scene.translate(Vector3::new(3.0, -4.0, 12.0), ball);

    assert_eq!(scene.distance(moved, Point3::new(3.0, -4.0, 12.0)), -1.0);
    assert_eq!(scene.distance(moved, Point3::new(0.0, 0.0, 0.0)), 12.0);
}

#[test]
fn rotation_follows_the_right_hand_rule() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let moved = scene.xtranslate(5.0, ball);
    let rotated = scene.zrotate(FRAC_PI_2, moved);

    // a quarter turn around +z sends +x to +y
    let d = scene.distance(rotated, Point3::new(0.0, 5.0, 0.0));
    assert!((d + 1.0).abs() < 1e-4, "expected ≈ -1, got {d}");
}

#[test]
fn scaling_stretches_one_axis() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let wide = scene.xscale(2.0, ball);

    // the surface now passes through x = ±2
    let on_surface = scene.distance(wide, Point3::new(2.0, 0.0, 0.0));
    assert!(on_surface.abs() < 1e-6);
    assert!(scene.distance(wide, Point3::new(1.9, 0.0, 0.0)) < 0.0);
    assert!(scene.distance(wide, Point3::new(2.1, 0.0, 0.0)) > 0.0);
    // y stays put
    assert!(scene.distance(wide, Point3::new(0.0, 1.5, 0.0)) > 0.0);
}

#[test]
#[should_panic(expected = "zero scale factor")]
fn zero_scale_is_rejected() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let _ = scene.scale(Vector3::new(1.0, 0.0, 1.0), ball);
}

#[test]
fn primitive_bounding_boxes() {
    let mut scene = Scene::new();
    let sphere = scene.sphere(42.0);
    let cube = scene.cube(42.0);

    let bb = scene.bounding_box_of(sphere);
    assert_eq!(bb.origin, Point3::new(-42.0, -42.0, -42.0));
    assert_eq!(bb.length, 84.0);

    let bb = scene.bounding_box_of(cube);
    assert_eq!(bb.origin, Point3::new(-21.0, -21.0, -21.0));
    assert_eq!(bb.length, 42.0);
}

#[test]
fn translated_bounding_box() {
    let mut scene = Scene::new();
    let ball = scene.sphere(1.0);
    let moved = scene.translate(Vector3::new(10.0, 0.0, 0.0), ball);

    let bb = scene.bounding_box_of(moved);
    assert_eq!(bb.origin, Point3::new(9.0, -1.0, -1.0));
    assert_eq!(bb.length, 2.0);
}

/// The union bound covers both operands, re-cubed to the widest extent.
#[test]
fn union_bounding_box() {
    let mut scene = Scene::new();
    let a = scene.sphere(1.0);
    let ball = scene.sphere(1.0);
    let b = scene.xtranslate(10.0, ball);
    let both = scene.unite(a, b);

    let bb = scene.bounding_box_of(both);
    assert_eq!(bb.origin, Point3::new(-1.0, -1.0, -1.0));
    assert_eq!(bb.length, 12.0);
}

#[test]
fn difference_bounding_box_is_the_left_operand() {
    let mut scene = Scene::new();
    let a = scene.sphere(5.0);
    let b = scene.sphere(50.0);
    let carved = scene.subtract(a, b);

    let bb = scene.bounding_box_of(carved);
    assert_eq!(bb.length, 10.0);
}

#[test]
fn scene_bounding_box_folds_over_toplevels() {
    let mut scene = Scene::new();
    let a = scene.sphere(1.0);
    scene.toplevel(a, 2);
    let ball = scene.sphere(1.0);
    let b = scene.ytranslate(6.0, ball);
    scene.toplevel(b, 3);

    let bb = scene.bounding_box();
    assert_eq!(bb.origin, Point3::new(-1.0, -1.0, -1.0));
    assert_eq!(bb.length, 8.0);

    let materials: Vec<_> = scene.toplevels().map(|(_, m)| m).collect();
    assert_eq!(materials, vec![2, 3]);
}

/// Nodes print back in the scene language.
#[test]
fn display_round_trips_the_language() {
    let mut scene = Scene::new();
    let ball = scene.sphere(10.0);
    let box_ = scene.cube(4.0);
    let part = scene.subtract(box_, ball);
    let all = scene.unite(part, ball);

    assert_eq!(scene.display(ball).to_string(), "sphere(10)");
    assert_eq!(
        scene.display(all).to_string(),
        "unite(subtract(cube(4), sphere(10)), sphere(10))"
    );

    let moved = scene.xtranslate(1.0, ball);
    assert_eq!(
        scene.display(moved).to_string(),
        "transform(matrix.., sphere(10))"
    );

    let top = scene.toplevel(part, 2);
    assert_eq!(
        scene.display(top).to_string(),
        "build 2 subtract(cube(4), sphere(10))"
    );
}

#[test]
fn cube_union_recubes() {
    let a = AACube::new(Point3::new(0.0, 0.0, 0.0), 1.0);
    let b = AACube::new(Point3::new(4.0, 0.0, 0.0), 1.0);
    let u = a.union(&b);
    assert_eq!(u.origin, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(u.length, 5.0);
    assert!(u.contains(&Point3::new(4.5, 0.5, 0.5)));
    assert!(!u.contains(&Point3::new(-0.5, 0.5, 0.5)));
}
