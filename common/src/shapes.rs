use rand::Rng;

/// Axis-aligned box stored as min/max extents.
///
/// Point membership is closed on the minimum bound and open on the maximum
/// bound, so the four quarters of a region never share a point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Region {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Region {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.y_min + self.y_max) / 2.0
    }

    /// Truncated midpoint used to split the region into quadrants.
    pub fn origin(&self) -> Point {
        Point::new(
            self.x_min + (self.width() / 2.0).floor(),
            self.y_min + (self.height() / 2.0).floor(),
        )
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }

    /// True when `inner` lies within this region, edges included.
    pub fn contains_region(&self, inner: &Region) -> bool {
        self.x_min <= inner.x_min
            && self.x_max >= inner.x_max
            && self.y_min <= inner.y_min
            && self.y_max >= inner.y_max
    }

    pub fn is_well_formed(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }

    pub fn get_random_circle_coords_inside<R: Rng>(&self, radius: f32, rng: &mut R) -> (f32, f32) {
        (
            self._safe_randf32(rng, self.x_min + radius, self.x_max - radius),
            self._safe_randf32(rng, self.y_min + radius, self.y_max - radius),
        )
    }

    /// Integer-valued center for a circle of integer `radius` kept fully inside.
    pub fn get_random_integer_circle_coords_inside<R: Rng>(
        &self,
        radius: u32,
        rng: &mut R,
    ) -> (f32, f32) {
        let radius = radius as i64;
        (
            self._safe_randi64(rng, self.x_min as i64 + radius, self.x_max as i64 - radius) as f32,
            self._safe_randi64(rng, self.y_min as i64 + radius, self.y_max as i64 - radius) as f32,
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }

    fn _safe_randi64<R: Rng>(&self, rng: &mut R, min: i64, max: i64) -> i64 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 0.0,
            y_max: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A circle with a caller-owned payload.
///
/// Two circles are the same shape when `(x, y, radius)` match exactly; `hit`
/// and `data` never take part in that comparison.
#[derive(Debug, Copy, Clone)]
pub struct Circle<T = ()> {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hit: bool,
    pub data: T,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self::with_data(x, y, radius, ())
    }
}

impl<T> Circle<T> {
    pub fn with_data(x: f32, y: f32, radius: f32, data: T) -> Self {
        Self {
            x,
            y,
            radius,
            hit: false,
            data,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn update(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn update_with_radius(&mut self, x: f32, y: f32, radius: f32) {
        self.x = x;
        self.y = y;
        self.radius = radius;
    }

    pub fn same_position<U>(&self, other: &Circle<U>) -> bool {
        self.x == other.x && self.y == other.y && self.radius == other.radius
    }

    pub fn bounding_region(&self) -> Region {
        Region {
            x_min: self.x - self.radius,
            y_min: self.y - self.radius,
            x_max: self.x + self.radius,
            y_max: self.y + self.radius,
        }
    }

    /// Replaces the payload, keeping geometry and the hit mark.
    pub fn map_data<U, F: FnOnce(T) -> U>(self, f: F) -> Circle<U> {
        Circle {
            x: self.x,
            y: self.y,
            radius: self.radius,
            hit: self.hit,
            data: f(self.data),
        }
    }
}

impl<T: Default> Default for Circle<T> {
    fn default() -> Self {
        Self::with_data(0.0, 0.0, 0.0, T::default())
    }
}
