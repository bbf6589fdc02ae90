use super::cfg::EARTH_RADIUS_M;
use super::*;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn distance_one_degree_on_equator() {
    let d = distance_m(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
    let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
    assert!(close(d, expected, 1e-6), "{d} vs {expected}");
    // symmetric, zero on coincident points
    assert!(close(d, distance_m(Point::new(0.0, 1.0), Point::new(0.0, 0.0)), 1e-9));
    assert_eq!(distance_m(Point::new(12.0, 34.0), Point::new(12.0, 34.0)), 0.0);
}

#[test]
fn bearings_cardinal_directions() {
    let o = Point::new(0.0, 0.0);
    assert!(close(initial_bearing_deg(o, Point::new(1.0, 0.0)), 0.0, 1e-9));
    assert!(close(initial_bearing_deg(o, Point::new(0.0, 1.0)), 90.0, 1e-9));
    assert!(close(initial_bearing_deg(o, Point::new(-1.0, 0.0)), 180.0, 1e-9));
    assert!(close(initial_bearing_deg(o, Point::new(0.0, -1.0)), 270.0, 1e-9));
}

#[test]
fn destination_inverts_distance_and_bearing() {
    let start = Point::new(51.5, -0.12);
    for bearing in [0.0, 33.0, 90.0, 181.5, 300.0, -45.0] {
        let p = destination(start, bearing, 2_500.0);
        assert!(close(distance_m(start, p), 2_500.0, 1e-6));
        let expected = (bearing + 360.0) % 360.0;
        let got = initial_bearing_deg(start, p);
        let diff = ((got - expected + 540.0) % 360.0 - 180.0).abs();
        assert!(diff < 1e-6, "bearing {bearing}: got {got}");
    }
}

#[test]
fn midpoint_is_equidistant() {
    let a = Point::new(35.0, 139.0);
    let b = Point::new(35.3, 139.9);
    let m = midpoint(a, b);
    let (da, db) = (distance_m(m, a), distance_m(m, b));
    assert!(close(da, db, 1e-6));
    assert!(close(da + db, distance_m(a, b), 1e-6));
    // Equator case matches the plain average.
    let m0 = midpoint(Point::new(0.0, 0.0), Point::new(0.0, 0.01));
    assert!(close(m0.lat, 0.0, 1e-12) && close(m0.lng, 0.005, 1e-12));
}

#[test]
fn longitude_wraps() {
    assert!(close(normalize_lng(190.0), -170.0, 1e-12));
    assert!(close(normalize_lng(-190.0), 170.0, 1e-12));
    assert!(close(normalize_lng(45.0), 45.0, 1e-12));
    let p = destination(Point::new(0.0, 179.999), 90.0, 1_000.0);
    assert!(p.lng < 0.0);
}

#[test]
fn bounds_contains_inclusive_and_normalized() {
    let b = Bounds::from_corners(Point::new(1.0, 1.0), Point::new(0.0, 0.0));
    assert_eq!(b.south_west, Point::new(0.0, 0.0));
    assert!(b.contains(Point::new(0.0, 0.0)));
    assert!(b.contains(Point::new(1.0, 0.5)));
    assert!(!b.contains(Point::new(1.0001, 0.5)));
    assert!(Bounds::world().contains(Point::new(-89.0, 179.0)));
}

#[test]
fn display_label_placeholder() {
    let r = PointRef::new("g1", Point::new(0.0, 0.0), "");
    assert_eq!(r.display_label(), "N/A");
    let r = PointRef::new("g2", Point::new(0.0, 0.0), "Shrine");
    assert_eq!(r.display_label(), "Shrine");
    assert_eq!(r.id.to_string(), "g2");
}
