//! Power-of-two alignment for tree bounds.
//!
//! Aligning the root region to powers of two keeps subdivisions close to
//! exact halvings. Origins are floored, so integer bounds stay integer.

use crate::shapes::Region;

/// Largest power of two `<= n`, mirrored around zero for negative `n`.
///
/// `floor_pow2(-3.0)` is `-4.0`. Zero and non-finite values are returned as is.
pub fn floor_pow2(n: f32) -> f32 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    if n < 0.0 {
        -pow2_at_least(-n)
    } else {
        pow2_at_most(n)
    }
}

/// Smallest power of two `>= n`, mirrored around zero for negative `n`.
///
/// `ceil_pow2(-3.0)` is `-2.0`. Zero and non-finite values are returned as is.
pub fn ceil_pow2(n: f32) -> f32 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    if n < 0.0 {
        -pow2_at_most(-n)
    } else {
        pow2_at_least(n)
    }
}

fn pow2_at_most(m: f32) -> f32 {
    let mut p = 1.0f32;
    if m >= 1.0 {
        while p * 2.0 <= m {
            p *= 2.0;
        }
    } else {
        while p > m {
            p /= 2.0;
        }
    }
    p
}

fn pow2_at_least(m: f32) -> f32 {
    let mut p = 1.0f32;
    if m > 1.0 {
        while p < m {
            p *= 2.0;
        }
    } else {
        while p / 2.0 >= m {
            p /= 2.0;
        }
    }
    p
}

/// Integer counterpart of [`floor_pow2`].
pub fn floor_pow2_i64(n: i64) -> i64 {
    match n {
        0 => 0,
        n if n < 0 => -(n.unsigned_abs().next_power_of_two() as i64),
        n => 1i64 << (63 - n.leading_zeros()),
    }
}

/// Integer counterpart of [`ceil_pow2`].
pub fn ceil_pow2_i64(n: i64) -> i64 {
    match n {
        0 => 0,
        n if n < 0 => {
            let m = n.unsigned_abs();
            -(1i64 << (63 - m.leading_zeros()))
        }
        n => (n as u64).next_power_of_two() as i64,
    }
}

/// Rounds each edge outward to a power-of-two boundary and returns the
/// tightest square covering all four rounded edges.
///
/// The side is only a power of two when the edges share a sign: `(-3, -100,
/// 20, 9)` becomes `(-128, -128, 32, 32)`, a side of 160. Use
/// [`square_region`] when every halving must be exact.
pub fn normalize_region(region: &Region) -> Region {
    let x_min = floor_pow2(region.x_min);
    let y_min = floor_pow2(region.y_min);
    let x_max = ceil_pow2(region.x_max);
    let y_max = ceil_pow2(region.y_max);

    let min = x_min.min(y_min);
    let max = x_max.max(y_max);
    Region::new(min, min, max, max)
}

/// Power-of-two aligned square `(min, side)` covering the integer box
/// `[x_min, x_max) x [y_min, y_max)`. `side` is always a power of two.
pub fn square_region(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> (i64, i64) {
    let min = floor_pow2_i64(x_min).min(floor_pow2_i64(y_min));
    let extent = (x_max.max(y_max) - min).max(1);
    let side = (extent as u64).next_power_of_two() as i64;
    (min, side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_and_ceil_positive() {
        assert_eq!(floor_pow2(1.0), 1.0);
        assert_eq!(floor_pow2(700.0), 512.0);
        assert_eq!(floor_pow2(512.0), 512.0);
        assert_eq!(ceil_pow2(700.0), 1024.0);
        assert_eq!(ceil_pow2(512.0), 512.0);
        assert_eq!(ceil_pow2(3.0), 4.0);
    }

    #[test]
    fn floor_and_ceil_fractions() {
        assert_eq!(floor_pow2(0.3), 0.25);
        assert_eq!(ceil_pow2(0.3), 0.5);
        assert_eq!(ceil_pow2(0.5), 0.5);
    }

    #[test]
    fn floor_and_ceil_mirror_negatives() {
        assert_eq!(floor_pow2(-3.0), -4.0);
        assert_eq!(ceil_pow2(-3.0), -2.0);
        assert_eq!(floor_pow2(-4.0), -4.0);
        assert_eq!(ceil_pow2(-4.0), -4.0);
        assert_eq!(floor_pow2(0.0), 0.0);
        assert_eq!(ceil_pow2(0.0), 0.0);
    }

    #[test]
    fn integer_helpers_agree() {
        for n in [-1000i64, -17, -4, -3, -1, 1, 2, 3, 5, 64, 700, 1024] {
            assert_eq!(floor_pow2_i64(n) as f32, floor_pow2(n as f32), "floor {}", n);
            assert_eq!(ceil_pow2_i64(n) as f32, ceil_pow2(n as f32), "ceil {}", n);
        }
    }

    #[test]
    fn normalize_region_squares_bounds() {
        let region = normalize_region(&Region::new(0.0, 0.0, 1000.0, 700.0));
        assert_eq!(region, Region::new(0.0, 0.0, 1024.0, 1024.0));

        let region = normalize_region(&Region::new(-3.0, -100.0, 20.0, 9.0));
        assert_eq!(region, Region::new(-128.0, -128.0, 32.0, 32.0));
    }

    #[test]
    fn normalize_region_mixed_signs_is_not_power_of_two() {
        let r = normalize_region(&Region::new(-3.0, -100.0, 20.0, 9.0));
        assert_eq!(r, Region::new(-128.0, -128.0, 32.0, 32.0));
        assert_eq!(r.width(), 160.0);
    }

    #[test]
    fn square_region_is_power_of_two() {
        assert_eq!(square_region(0, 0, 8, 8), (0, 8));
        assert_eq!(square_region(0, 0, 5, 3), (0, 8));
        assert_eq!(square_region(100, 100, 300, 300), (64, 256));
    }
}
