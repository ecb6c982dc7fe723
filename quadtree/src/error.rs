use crate::shapes::{Circle, Region};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadtreeError {
    InvalidRegion {
        x_min: f32,
        y_min: f32,
        x_max: f32,
        y_max: f32,
    },
    InvalidCircleRadius { radius: f32 },
    InvalidCircleCenter { x: f32, y: f32 },
    CircleOutOfBounds {
        x: f32,
        y: f32,
        radius: f32,
        bounds_x_min: f32,
        bounds_y_min: f32,
        bounds_x_max: f32,
        bounds_y_max: f32,
    },
    DuplicateCircle { x: f32, y: f32, radius: f32 },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::InvalidRegion {
                x_min,
                y_min,
                x_max,
                y_max,
            } => {
                write!(
                    f,
                    "region extents must be finite with min < max (x_min: {}, y_min: {}, x_max: {}, y_max: {})",
                    x_min, y_min, x_max, y_max
                )
            }
            QuadtreeError::InvalidCircleRadius { radius } => {
                write!(
                    f,
                    "circle radius must be finite and non-negative (radius: {})",
                    radius
                )
            }
            QuadtreeError::InvalidCircleCenter { x, y } => {
                write!(f, "circle center must be finite (x: {}, y: {})", x, y)
            }
            QuadtreeError::CircleOutOfBounds {
                x,
                y,
                radius,
                bounds_x_min,
                bounds_y_min,
                bounds_x_max,
                bounds_y_max,
            } => {
                write!(
                    f,
                    "circle does not overlap quadtree bounds (x: {}, y: {}, radius: {}, bounds_x_min: {}, bounds_y_min: {}, bounds_x_max: {}, bounds_y_max: {})",
                    x, y, radius, bounds_x_min, bounds_y_min, bounds_x_max, bounds_y_max
                )
            }
            QuadtreeError::DuplicateCircle { x, y, radius } => {
                write!(
                    f,
                    "circle already present (x: {}, y: {}, radius: {})",
                    x, y, radius
                )
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}

pub(crate) fn validate_region(region: &Region) -> QuadtreeResult<()> {
    if region.is_well_formed() {
        Ok(())
    } else {
        Err(QuadtreeError::InvalidRegion {
            x_min: region.x_min,
            y_min: region.y_min,
            x_max: region.x_max,
            y_max: region.y_max,
        })
    }
}

#[inline(always)]
pub(crate) fn validate_circle<T>(circle: &Circle<T>) -> QuadtreeResult<()> {
    if !circle.radius.is_finite() || circle.radius < 0.0 {
        return Err(QuadtreeError::InvalidCircleRadius {
            radius: circle.radius,
        });
    }
    if !circle.x.is_finite() || !circle.y.is_finite() {
        return Err(QuadtreeError::InvalidCircleCenter {
            x: circle.x,
            y: circle.y,
        });
    }
    Ok(())
}
