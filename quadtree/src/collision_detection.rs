use crate::shapes::{Circle, Region};

/// Closest-point test between a circle and a region. Touching counts.
pub fn circle_rectangle<T>(region: &Region, circle: &Circle<T>) -> bool {
    let half_width = region.width() / 2.0;
    let half_height = region.height() / 2.0;
    let circle_distance_x = (circle.x - region.center_x()).abs();
    let circle_distance_y = (circle.y - region.center_y()).abs();

    if circle_distance_x > half_width + circle.radius {
        return false;
    }
    if circle_distance_y > half_height + circle.radius {
        return false;
    }

    if circle_distance_x <= half_width || circle_distance_y <= half_height {
        return true;
    }

    let corner_dx = circle_distance_x - half_width;
    let corner_dy = circle_distance_y - half_height;
    let corner_distance_sq = corner_dx * corner_dx + corner_dy * corner_dy;

    corner_distance_sq <= circle.radius * circle.radius
}

/// Default collision predicate.
///
/// Only the sum of radii bounds the test, so a circle lying wholly inside a
/// larger one collides with it even though their edges never meet.
pub fn circle_circle<A, B>(a: &Circle<A>, b: &Circle<B>) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let distance_sq = dx * dx + dy * dy;
    let collision_distance = a.radius + b.radius;
    let collision_distance_sq = collision_distance * collision_distance;
    distance_sq <= collision_distance_sq
}

/// Like [`circle_circle`] but also requires the edges to meet, so nested
/// circles that do not touch are not reported.
pub fn circle_edges_touch<A, B>(a: &Circle<A>, b: &Circle<B>) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let distance_sq = dx * dx + dy * dy;
    let radius_gap = a.radius - b.radius;
    circle_circle(a, b) && distance_sq >= radius_gap * radius_gap
}
