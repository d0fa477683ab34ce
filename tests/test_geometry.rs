// tests/test_geometry.rs

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use spinefield::geometry::{orientation, Intersection, Line, Point, Relation, Segment, Turn};

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

#[test]
fn test_crossing_diagonals() {
    let a = seg(0.0, 0.0, 2.0, 2.0);
    let b = seg(0.0, 2.0, 2.0, 0.0);
    assert_eq!(a.relation(&b), Relation::Cross);
    assert_eq!(b.relation(&a), Relation::Cross);

    let crossing = a.intersection(&b).and_then(Intersection::point).unwrap();
    assert_relative_eq!(crossing.x, 1.0);
    assert_relative_eq!(crossing.y, 1.0);
}

#[test]
fn test_parallel_disjoint_segments_do_not_cross() {
    let a = seg(0.0, 0.0, 1.0, 0.0);
    let b = seg(0.0, 1.0, 1.0, 1.0);
    assert_eq!(a.relation(&b), Relation::NotCross);
    assert!(!a.overlaps(&b));
    assert!(a.intersection(&b).is_none());

    // The supporting lines are parallel.
    assert_eq!(a.line().relation(&b.line()), Relation::Parallel);
    assert_eq!(a.line().intersection(&b.line()), Intersection::Parallel);
}

#[test]
fn test_lines_cross_where_segments_do_not() {
    let a = seg(0.0, 0.0, 1.0, 0.0);
    let b = seg(5.0, -1.0, 5.0, 1.0);
    assert_eq!(a.relation(&b), Relation::NotCross);

    match a.line().intersection(&b.line()) {
        Intersection::At(p) => {
            assert_relative_eq!(p.x, 5.0);
            assert_abs_diff_eq!(p.y, 0.0);
        }
        other => panic!("expected a crossing point, got {:?}", other),
    }
}

#[test]
fn test_touching_endpoints_count_as_contact() {
    let a = seg(0.0, 0.0, 1.0, 0.0);
    let corner = seg(1.0, 0.0, 1.0, 1.0);
    let tee = seg(0.5, 0.0, 0.5, 2.0);
    assert!(a.overlaps(&corner));
    assert!(a.overlaps(&tee));
    assert_eq!(a.relation(&tee), Relation::Cross);
}

#[test]
fn test_collinear_segments() {
    let a = seg(0.0, 0.0, 2.0, 0.0);
    let overlapping = seg(1.0, 0.0, 3.0, 0.0);
    let apart = seg(2.5, 0.0, 4.0, 0.0);

    assert_eq!(a.relation(&overlapping), Relation::Same);
    assert_eq!(
        a.intersection(&overlapping),
        Some(Intersection::Coincident)
    );
    assert_eq!(a.relation(&apart), Relation::NotCross);
}

#[test]
fn test_orientation_cases() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    assert_eq!(orientation(a, b, Point::new(0.0, 1.0)), Turn::CounterClockwise);
    assert_eq!(orientation(a, b, Point::new(0.0, -1.0)), Turn::Clockwise);
    assert_eq!(orientation(a, b, Point::new(-1.0, 0.0)), Turn::Behind);
    assert_eq!(orientation(a, b, Point::new(2.0, 0.0)), Turn::Beyond);
    assert_eq!(orientation(a, b, Point::new(0.5, 0.0)), Turn::Between);
    assert_eq!(orientation(a, b, a), Turn::Between);
    assert_eq!(orientation(a, b, b), Turn::Between);

    assert_eq!(Turn::CounterClockwise.value(), 1);
    assert_eq!(Turn::Clockwise.value(), -1);
    assert_eq!(Turn::Between.value(), 0);
    assert_eq!(Turn::Behind.value(), -2);
    assert_eq!(Turn::Beyond.value(), 2);
}

#[test]
fn test_orientation_drift_below_tolerance_is_collinear() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    assert_eq!(orientation(a, b, Point::new(0.5, 1e-9)), Turn::Between);
}

#[test]
fn test_orientation_swapping_a_and_b_flips_turn() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut checked = 0;
    for _ in 0..2000 {
        let a = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let b = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let c = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        if (b - a).det(c - a).abs() < 1e-3 {
            continue;
        }
        assert_eq!(
            orientation(a, b, c).value(),
            -orientation(b, a, c).value(),
            "asymmetric turn for {a:?} {b:?} {c:?}"
        );
        checked += 1;
    }
    assert!(checked > 1900);
}

#[test]
fn test_segment_relation_is_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..2000 {
        let mut point = || Point::new(rng.gen_range(0.0..4.0), rng.gen_range(0.0..4.0));
        let a = Segment::new(point(), point());
        let b = Segment::new(point(), point());
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }
}

#[test]
fn test_distances() {
    let line = Line::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
    assert_relative_eq!(line.distance_to(Point::new(5.0, 3.0)), 3.0);

    let s = seg(0.0, 0.0, 2.0, 0.0);
    assert_relative_eq!(s.distance_to(Point::new(5.0, 3.0)), 18.0f64.sqrt());
    assert_relative_eq!(s.distance_to(Point::new(-1.0, 0.0)), 1.0);
    assert_relative_eq!(s.distance_to(Point::new(1.0, 2.0)), 2.0);
    assert_abs_diff_eq!(s.distance_to(Point::new(1.0, 0.0)), 0.0);
}

#[test]
fn test_point_arithmetic() {
    let p = Point::new(3.0, 4.0);
    let q = Point::new(1.0, 2.0);
    assert_eq!(p + q, Point::new(4.0, 6.0));
    assert_eq!(p - q, Point::new(2.0, 2.0));
    assert_eq!(-q, Point::new(-1.0, -2.0));
    assert_eq!(p * 2.0, Point::new(6.0, 8.0));
    assert_eq!(p * q, Point::new(3.0, 8.0));
    assert_eq!(p / 2.0, Point::new(1.5, 2.0));
    assert_eq!(p / q, Point::new(3.0, 2.0));
    assert_relative_eq!(p.norm(), 5.0);
    assert_relative_eq!(p.dot(q), 11.0);
    assert_relative_eq!(p.det(q), 2.0);
    assert_eq!(q.rotate90(), Point::new(-2.0, 1.0));
    assert_relative_eq!(Point::new(0.0, 1.0).degrees(), 90.0);

    let r = Point::new(1.0, 0.0).rotate(std::f64::consts::FRAC_PI_2);
    assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-12);
}
