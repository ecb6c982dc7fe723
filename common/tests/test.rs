use common::shapes::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let region = Region::new(2.0, 3.0, 6.0, 9.0);
    assert_eq!(region.width(), 4.0);
    assert_eq!(region.height(), 6.0);
    assert_eq!(region.center_x(), 4.0);
    assert_eq!(region.center_y(), 6.0);
    assert!(region.is_well_formed());
}

#[test]
fn test_origin_truncates() {
    assert_eq!(Region::new(0.0, 0.0, 1024.0, 1024.0).origin(), Point::new(512.0, 512.0));
    assert_eq!(Region::new(0.0, 0.0, 5.0, 3.0).origin(), Point::new(2.0, 1.0));
    assert_eq!(Region::new(4.0, 4.0, 5.0, 5.0).origin(), Point::new(4.0, 4.0));
}

#[test]
fn test_contains_point_half_open() {
    let region = Region::new(0.0, 0.0, 4.0, 6.0);
    assert!(region.contains_point(0.0, 0.0));
    assert!(region.contains_point(3.9, 5.9));
    assert!(!region.contains_point(4.0, 3.0));
    assert!(!region.contains_point(2.0, 6.0));
    assert!(!region.contains_point(-0.1, 3.0));
}

#[test]
fn test_contains_region() {
    let outer = Region::new(0.0, 0.0, 8.0, 8.0);
    assert!(outer.contains_region(&Region::new(0.0, 0.0, 8.0, 8.0)));
    assert!(outer.contains_region(&Region::new(2.0, 2.0, 4.0, 4.0)));
    assert!(!outer.contains_region(&Region::new(6.0, 6.0, 9.0, 7.0)));
}

#[test]
fn test_malformed_regions() {
    assert!(!Region::new(1.0, 0.0, 1.0, 4.0).is_well_formed());
    assert!(!Region::new(0.0, 5.0, 4.0, 1.0).is_well_formed());
    assert!(!Region::new(0.0, 0.0, f32::INFINITY, 4.0).is_well_formed());
    assert!(!Region::default().is_well_formed());
}

#[test]
fn test_circle_identity() {
    let mut a = Circle::with_data(1.0, 2.0, 3.0, "a");
    let b = Circle::new(1.0, 2.0, 3.0);
    a.hit = true;
    assert!(a.same_position(&b));
    assert!(!a.same_position(&Circle::new(1.0, 2.0, 3.5)));

    a.update(4.0, 5.0);
    assert_eq!(a.center(), Point::new(4.0, 5.0));
    a.update_with_radius(4.0, 5.0, 1.0);
    assert_eq!(a.radius(), 1.0);
}

#[test]
fn test_circle_bounding_region() {
    let circle = Circle::new(10.0, 20.0, 5.0);
    assert_eq!(circle.bounding_region(), Region::new(5.0, 15.0, 15.0, 25.0));
}

#[test]
fn test_map_data_keeps_geometry() {
    let mut circle = Circle::with_data(1.0, 1.0, 2.0, 7u32);
    circle.hit = true;
    let mapped = circle.map_data(|n| n.to_string());
    assert!(mapped.same_position(&circle));
    assert!(mapped.hit);
    assert_eq!(mapped.data, "7");
}

#[test]
fn test_get_random_circle_coords_inside() {
    let region = Region::new(2.0, 3.0, 8.0, 11.0);
    let radius = 1.0;

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..10 {
        let (x, y) = region.get_random_circle_coords_inside(radius, &mut rng);
        assert!(x - radius >= region.x_min && x + radius <= region.x_max);
        assert!(y - radius >= region.y_min && y + radius <= region.y_max);
    }
}

#[test]
fn test_get_random_circle_coords_inside_small_region() {
    let region = Region::new(2.0, 3.0, 4.0, 5.0);
    let radius = 2.0;
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    let (x, y) = region.get_random_circle_coords_inside(radius, &mut rng);
    // Too small to fit: clamped to the minimum corner.
    assert_eq!(x, region.x_min + radius);
    assert_eq!(y, region.y_min + radius);
}

#[test]
fn test_get_random_integer_circle_coords_inside() {
    let region = Region::new(0.0, 0.0, 64.0, 64.0);
    let mut rng: StdRng = SeedableRng::seed_from_u64(9);

    for radius in 1..10u32 {
        let (x, y) = region.get_random_integer_circle_coords_inside(radius, &mut rng);
        assert_eq!(x.fract(), 0.0);
        assert_eq!(y.fract(), 0.0);
        assert!(x >= radius as f32 && x <= 64.0 - radius as f32);
        assert!(y >= radius as f32 && y <= 64.0 - radius as f32);
    }
}
